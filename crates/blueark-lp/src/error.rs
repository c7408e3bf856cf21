//! Step compilation and solver I/O error types.

use blueark_expr::ExprError;

/// Error type for building solver input and reading solver output.
#[derive(Debug, Clone, PartialEq)]
pub enum LpError {
    /// Expression or rendered-text failure.
    Expr(ExprError),
    /// Bound descriptor not of the form `<name> <= <value>`.
    UnparsableBoundDescriptor { index: usize, descriptor: String },
    /// Turbine descriptor not of the form `<value>x<id>`.
    UnparsableTurbineDescriptor { index: usize, descriptor: String },
    /// Solver output line not of the form `<name>,<value>` (1-based line number).
    UnparsableSolverLine { line_number: usize, line: String },
    /// Constraint with no variable terms.
    DegenerateConstraint { row: usize, rendered: String },
    /// Solver reported no feasible solution.
    Infeasible,
    /// Solver produced no output at all.
    EmptySolverOutput,
    /// Solver backend invocation failed.
    SolverFailed { detail: String },
    /// Configuration could not be loaded.
    InvalidConfig { reason: String },
    /// Reading or writing a solver file failed.
    Io { path: String, message: String },
}

impl LpError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LpError::Expr(err) => err.code(),
            LpError::UnparsableBoundDescriptor { .. } => "LP_UNPARSABLE_BOUND",
            LpError::UnparsableTurbineDescriptor { .. } => "LP_UNPARSABLE_TURBINE",
            LpError::UnparsableSolverLine { .. } => "LP_UNPARSABLE_SOLVER_LINE",
            LpError::DegenerateConstraint { .. } => "LP_DEGENERATE_CONSTRAINT",
            LpError::Infeasible => "SOLVER_INFEASIBLE",
            LpError::EmptySolverOutput => "SOLVER_EMPTY_OUTPUT",
            LpError::SolverFailed { .. } => "SOLVER_FAILED",
            LpError::InvalidConfig { .. } => "CONFIG_INVALID",
            LpError::Io { .. } => "LP_IO",
        }
    }

    /// True for errors raised by the solver run rather than by its inputs.
    pub fn is_solver_failure(&self) -> bool {
        matches!(
            self,
            LpError::Infeasible | LpError::EmptySolverOutput | LpError::SolverFailed { .. }
        )
    }
}

impl std::fmt::Display for LpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LpError::Expr(err) => write!(f, "{err}"),
            LpError::UnparsableBoundDescriptor { index, descriptor } => write!(
                f,
                "[{}] Bound descriptor {} '{}' is not '<name> <= <value>'",
                self.code(),
                index,
                descriptor
            ),
            LpError::UnparsableTurbineDescriptor { index, descriptor } => write!(
                f,
                "[{}] Turbine descriptor {} '{}' is not '<value>x<id>'",
                self.code(),
                index,
                descriptor
            ),
            LpError::UnparsableSolverLine { line_number, line } => write!(
                f,
                "[{}] Solver output line {} '{}' is not '<name>,<value>'",
                self.code(),
                line_number,
                line
            ),
            LpError::DegenerateConstraint { row, rendered } => write!(
                f,
                "[{}] Constraint {} has no variable terms: {}",
                self.code(),
                row,
                rendered
            ),
            LpError::Infeasible => write!(f, "[{}] Problem is infeasible", self.code()),
            LpError::EmptySolverOutput => {
                write!(f, "[{}] Solver produced no output", self.code())
            }
            LpError::SolverFailed { detail } => {
                write!(f, "[{}] Solver invocation failed: {}", self.code(), detail)
            }
            LpError::InvalidConfig { reason } => {
                write!(f, "[{}] Invalid configuration: {}", self.code(), reason)
            }
            LpError::Io { path, message } => {
                write!(f, "[{}] {}: {}", self.code(), path, message)
            }
        }
    }
}

impl std::error::Error for LpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LpError::Expr(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ExprError> for LpError {
    fn from(err: ExprError) -> Self {
        LpError::Expr(err)
    }
}
