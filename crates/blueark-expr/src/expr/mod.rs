//! Expression types for step constraints.
//!
//! - `core`       — Expression: constants, variables, sums, scaling
//! - `canonical`  — CanonicalForm and the normalizer/canonicalizer
//! - `constraint` — Constraint, Relation, CanonicalConstraint
//! - `render`     — deterministic text form
//! - `parse`      — canonical constraint text back into terms
//! - `builders`   — convenience constructors
//! - `error`      — expression errors

pub mod builders;
pub mod canonical;
pub mod constraint;
pub mod core;
pub mod error;
pub mod parse;
pub mod render;

pub use builders::{linear_sum, linear_terms};
pub use canonical::{CanonicalForm, canonicalize, normalize};
pub use constraint::{CanonicalConstraint, Constraint, Relation};
pub use core::Expression;
pub use error::ExprError;
pub use parse::parse_rendered;
pub use render::format_number;
