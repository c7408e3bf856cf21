//! Expression errors.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// Tree shape the normalizer cannot reduce.
    MalformedExpression { detail: String },
    /// Canonical constraint text that does not follow the rendered grammar.
    UnparsableRendered { input: String, reason: String },
}

impl ExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::MalformedExpression { .. } => "EXPR_MALFORMED",
            ExprError::UnparsableRendered { .. } => "EXPR_UNPARSABLE_RENDERED",
        }
    }
}

impl std::fmt::Display for ExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprError::MalformedExpression { detail } => {
                write!(f, "[{}] Malformed expression: {}", self.code(), detail)
            }
            ExprError::UnparsableRendered { input, reason } => write!(
                f,
                "[{}] Cannot parse '{}': {}",
                self.code(),
                input,
                reason
            ),
        }
    }
}

impl std::error::Error for ExprError {}
