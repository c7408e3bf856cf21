//! Solver input files.
//!
//! - matrix file: one row per constraint, the coefficients in column order,
//!   then the relation flag (`0` for `=`, `1` for `<=`) and the constant;
//!   a trailing `#` line lists the column names
//! - bounds file: `<name> <= <upper>` per known variable, `-1.0` when
//!   unspecified
//! - variables file: `<columns> <rows>` header, then
//!   `<lower> <upper> <name> <weight>` per column

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use blueark_expr::format_number;

use crate::bounds::BoundsTable;
use crate::config::CompileConfig;
use crate::error::LpError;
use crate::matrix::Matrix;
use crate::turbine::TurbineTable;

/// Lower bound for every column; flows and levels are non-negative.
const COLUMN_LOWER_BOUND: f64 = 0.0;

/// Paths of the files handed to the solver for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverFiles {
    pub matrix: PathBuf,
    pub bounds: PathBuf,
    pub variables: PathBuf,
    /// Where the solver is expected to write its output.
    pub solution: PathBuf,
}

impl SolverFiles {
    pub fn from_config(config: &CompileConfig) -> Self {
        Self {
            matrix: config.matrix_path(),
            bounds: config.bounds_path(),
            variables: config.variables_path(),
            solution: config.solution_path(),
        }
    }
}

pub fn format_matrix_file(matrix: &Matrix) -> String {
    let mut out = String::new();
    for ((row, relation), rhs) in matrix
        .rows()
        .iter()
        .zip(matrix.relations())
        .zip(matrix.rhs())
    {
        for coefficient in row {
            out.push_str(&format_number(*coefficient));
            out.push(' ');
        }
        let _ = writeln!(out, "{} {}", relation.solver_flag(), format_number(*rhs));
    }
    let _ = writeln!(out, "# {}", matrix.columns().join(" "));
    out
}

pub fn format_bounds_file(bounds: &BoundsTable) -> String {
    let mut out = String::new();
    for line in bounds.to_lines() {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Column table in the solver's native order: one line per matrix column.
pub fn format_variables_file(
    matrix: &Matrix,
    bounds: &BoundsTable,
    turbines: &TurbineTable,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", matrix.num_columns(), matrix.num_rows());
    for symbol in matrix.registry().iter() {
        let _ = writeln!(
            out,
            "{} {} {} {}",
            format_number(COLUMN_LOWER_BOUND),
            format_number(bounds.upper_or_sentinel(symbol)),
            symbol,
            format_number(turbines.weight(symbol))
        );
    }
    out
}

fn write_file(path: &Path, contents: &str) -> Result<(), LpError> {
    std::fs::write(path, contents).map_err(|err| LpError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Write matrix, bounds and variables files under the configured data dir.
pub fn write_solver_inputs(
    config: &CompileConfig,
    matrix: &Matrix,
    bounds: &BoundsTable,
    turbines: &TurbineTable,
) -> Result<SolverFiles, LpError> {
    std::fs::create_dir_all(&config.data_dir).map_err(|err| LpError::Io {
        path: config.data_dir.display().to_string(),
        message: err.to_string(),
    })?;

    let files = SolverFiles::from_config(config);
    write_file(&files.matrix, &format_matrix_file(matrix))?;
    write_file(&files.bounds, &format_bounds_file(bounds))?;
    write_file(
        &files.variables,
        &format_variables_file(matrix, bounds, turbines),
    )?;

    tracing::debug!(
        component = "files",
        operation = "write_solver_inputs",
        status = "success",
        data_dir = %config.data_dir.display(),
        rows = matrix.num_rows(),
        columns = matrix.num_columns(),
        "Wrote solver input files"
    );

    Ok(files)
}

/// Read a solver output file into lines.
pub fn read_solution_lines(path: &Path) -> Result<Vec<String>, LpError> {
    let text = std::fs::read_to_string(path).map_err(|err| LpError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    Ok(text.lines().map(str::to_string).collect())
}
