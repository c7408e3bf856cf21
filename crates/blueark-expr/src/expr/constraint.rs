//! Relational statements and their canonical form.

use indexmap::IndexMap;

use crate::expr::core::Expression;
use crate::expr::error::ExprError;

/// Canonical comparator of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Equal,
    LessEqual,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Equal => "=",
            Relation::LessEqual => "<=",
        }
    }

    /// Numeric tag understood by the solver's matrix reader.
    pub fn solver_flag(self) -> u8 {
        match self {
            Relation::Equal => 0,
            Relation::LessEqual => 1,
        }
    }
}

impl std::str::FromStr for Relation {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" => Ok(Relation::Equal),
            "<=" => Ok(Relation::LessEqual),
            other => Err(ExprError::UnparsableRendered {
                input: other.to_string(),
                reason: "unknown relation".to_string(),
            }),
        }
    }
}

/// A relational statement between two expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// `lhs = rhs`
    Equality { lhs: Expression, rhs: Expression },
    /// `lhs >= rhs`
    GreaterOrEqual { lhs: Expression, rhs: Expression },
}

impl Constraint {
    pub fn lhs(&self) -> &Expression {
        match self {
            Constraint::Equality { lhs, .. } | Constraint::GreaterOrEqual { lhs, .. } => lhs,
        }
    }

    pub fn rhs(&self) -> &Expression {
        match self {
            Constraint::Equality { rhs, .. } | Constraint::GreaterOrEqual { rhs, .. } => rhs,
        }
    }

    /// Relation tag after canonicalization.
    pub fn relation(&self) -> Relation {
        match self {
            Constraint::Equality { .. } => Relation::Equal,
            Constraint::GreaterOrEqual { .. } => Relation::LessEqual,
        }
    }
}

/// Collected variable terms on the left, a single constant on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalConstraint {
    terms: IndexMap<String, f64>,
    relation: Relation,
    rhs: f64,
}

impl CanonicalConstraint {
    pub fn new(terms: IndexMap<String, f64>, relation: Relation, rhs: f64) -> Self {
        Self {
            terms,
            relation,
            rhs,
        }
    }

    /// Terms in first-seen order.
    pub fn terms(&self) -> &IndexMap<String, f64> {
        &self.terms
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn coefficient(&self, symbol: &str) -> Option<f64> {
        self.terms.get(symbol).copied()
    }

    /// A constraint with no variable terms.
    pub fn is_degenerate(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn into_parts(self) -> (IndexMap<String, f64>, Relation, f64) {
        (self.terms, self.relation, self.rhs)
    }
}
