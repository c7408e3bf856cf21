//! Linear equation compiler for blueark simulation steps.
//!
//! Expression trees are normalized into canonical forms, constraints are
//! reduced to `terms = constant` or `terms <= constant`, and the canonical
//! text form is parsed back for matrix building.

pub mod expr;

pub use expr::{
    CanonicalConstraint, CanonicalForm, Constraint, ExprError, Expression, Relation, canonicalize,
    format_number, linear_sum, linear_terms, normalize, parse_rendered,
};
