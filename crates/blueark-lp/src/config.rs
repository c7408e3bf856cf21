//! Step compilation configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::LpError;

/// What to do with a constraint that has no variable terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateRows {
    /// Fail the step with `LpError::DegenerateConstraint`.
    #[default]
    Reject,
    /// Keep the row as an all-zero check against its constant.
    Keep,
}

impl DegenerateRows {
    pub fn as_str(self) -> &'static str {
        match self {
            DegenerateRows::Reject => "reject",
            DegenerateRows::Keep => "keep",
        }
    }
}

/// Where solver files go and how rows are checked.
///
/// Loadable from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Directory holding the solver input and output files.
    pub data_dir: PathBuf,
    pub matrix_file_name: String,
    pub bounds_file_name: String,
    /// Column table in the solver's native format.
    pub variables_file_name: String,
    pub solution_file_name: String,
    pub degenerate_rows: DegenerateRows,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            matrix_file_name: "matrix.dat".to_string(),
            bounds_file_name: "bounds.dat".to_string(),
            variables_file_name: "variables.dat".to_string(),
            solution_file_name: "solution.dat".to_string(),
            degenerate_rows: DegenerateRows::default(),
        }
    }
}

impl CompileConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the matrix file name.
    pub fn with_matrix_file_name(mut self, name: impl Into<String>) -> Self {
        self.matrix_file_name = name.into();
        self
    }

    /// Set the bounds file name.
    pub fn with_bounds_file_name(mut self, name: impl Into<String>) -> Self {
        self.bounds_file_name = name.into();
        self
    }

    /// Set the variables file name.
    pub fn with_variables_file_name(mut self, name: impl Into<String>) -> Self {
        self.variables_file_name = name.into();
        self
    }

    /// Set the solution file name.
    pub fn with_solution_file_name(mut self, name: impl Into<String>) -> Self {
        self.solution_file_name = name.into();
        self
    }

    /// Set the degenerate row policy.
    pub fn with_degenerate_rows(mut self, policy: DegenerateRows) -> Self {
        self.degenerate_rows = policy;
        self
    }

    pub fn matrix_path(&self) -> PathBuf {
        self.data_dir.join(&self.matrix_file_name)
    }

    pub fn bounds_path(&self) -> PathBuf {
        self.data_dir.join(&self.bounds_file_name)
    }

    pub fn variables_path(&self) -> PathBuf {
        self.data_dir.join(&self.variables_file_name)
    }

    pub fn solution_path(&self) -> PathBuf {
        self.data_dir.join(&self.solution_file_name)
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self, LpError> {
        serde_json::from_str(text).map_err(|err| LpError::InvalidConfig {
            reason: err.to_string(),
        })
    }

    /// Load a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, LpError> {
        let text = std::fs::read_to_string(path).map_err(|err| LpError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(
            component = "config",
            operation = "load",
            status = "success",
            path = %path.display(),
            degenerate_rows = config.degenerate_rows.as_str(),
            "Loaded compile configuration"
        );
        Ok(config)
    }
}
