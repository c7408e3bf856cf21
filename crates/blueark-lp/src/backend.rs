//! Solver backend seam.

use crate::files::SolverFiles;

/// An external solver run over the files written for one step.
///
/// Implementations invoke the solver (a subprocess, a service call, a
/// fixture in tests) and return its raw output lines: the objective value
/// first, then one `<name>,<value>` line per column. The call is synchronous
/// and must finish before the output is parsed.
pub trait SolverBackend {
    /// Failure raised by the backend itself.
    type Error: std::error::Error;

    /// Short name used in log events.
    fn name(&self) -> &str;

    /// Run the solver and return its output lines.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when the solver could not be run or exited
    /// unsuccessfully.
    fn solve(&mut self, files: &SolverFiles) -> Result<Vec<String>, Self::Error>;
}

/// Backend that reads whatever the solver left in the solution file.
///
/// Useful when the solver is run out of band (for example by a job
/// scheduler) and this step only needs to pick up its output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionFileBackend;

impl SolverBackend for SolutionFileBackend {
    type Error = std::io::Error;

    fn name(&self) -> &str {
        "solution-file"
    }

    fn solve(&mut self, files: &SolverFiles) -> Result<Vec<String>, Self::Error> {
        let text = std::fs::read_to_string(&files.solution)?;
        Ok(text.lines().map(str::to_string).collect())
    }
}
