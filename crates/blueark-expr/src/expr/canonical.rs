//! Normalization: constant folding and term collection.
//!
//! Terms keep first-seen order across the whole traversal, left to right.
//! Terms whose coefficients cancel to zero are kept.

use indexmap::IndexMap;

use crate::expr::constraint::{CanonicalConstraint, Constraint};
use crate::expr::core::Expression;

/// Constant-folded, term-collected expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalForm {
    terms: IndexMap<String, f64>,
    constant: f64,
}

impl CanonicalForm {
    /// Empty form (no terms, zero constant).
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            ..Default::default()
        }
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Terms in first-seen order.
    pub fn terms(&self) -> &IndexMap<String, f64> {
        &self.terms
    }

    pub fn coefficient(&self, symbol: &str) -> Option<f64> {
        self.terms.get(symbol).copied()
    }

    pub fn into_parts(self) -> (IndexMap<String, f64>, f64) {
        (self.terms, self.constant)
    }

    /// Add `coefficient` to `symbol`, appending it if unseen.
    pub fn add_term(&mut self, symbol: &str, coefficient: f64) {
        match self.terms.get_mut(symbol) {
            Some(existing) => *existing += coefficient,
            None => {
                self.terms.insert(symbol.to_string(), coefficient);
            }
        }
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// Merge another form into this one, keeping this form's order first.
    pub fn merge(&mut self, other: &CanonicalForm) {
        self.constant += other.constant;
        for (symbol, coefficient) in &other.terms {
            self.add_term(symbol, *coefficient);
        }
    }

    /// Multiply the constant and every coefficient.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            constant: self.constant * by,
            terms: self
                .terms
                .iter()
                .map(|(symbol, coefficient)| (symbol.clone(), coefficient * by))
                .collect(),
        }
    }

    /// Back to a tree: the constant first, then terms in order.
    pub fn to_expression(&self) -> Expression {
        let mut terms = Vec::with_capacity(self.terms.len() + 1);
        terms.push(Expression::Constant(self.constant));
        terms.extend(
            self.terms
                .iter()
                .map(|(symbol, coefficient)| Expression::Variable {
                    symbol: symbol.clone(),
                    coefficient: *coefficient,
                }),
        );
        Expression::Sum(terms)
    }
}

/// Reduce an expression tree to its canonical form.
pub fn normalize(expr: &Expression) -> CanonicalForm {
    match expr {
        Expression::Constant(value) => CanonicalForm::from_constant(*value),
        Expression::Variable {
            symbol,
            coefficient,
        } => {
            let mut form = CanonicalForm::new_empty();
            form.add_term(symbol, *coefficient);
            form
        }
        Expression::Sum(terms) => {
            let mut form = CanonicalForm::new_empty();
            for term in terms {
                form.merge(&normalize(term));
            }
            form
        }
        Expression::Scale { inner, factor } => normalize(inner).scale(*factor),
    }
}

/// Reduce a constraint to `terms <relation> constant`.
///
/// The right side is collected first and the negated left side merged into
/// it, so right-hand symbols lead. `lhs >= rhs` becomes `rhs - lhs <= 0`.
pub fn canonicalize(constraint: &Constraint) -> CanonicalConstraint {
    let mut combined = normalize(constraint.rhs());
    combined.merge(&normalize(constraint.lhs()).scale(-1.0));
    let (terms, constant) = combined.into_parts();
    CanonicalConstraint::new(terms, constraint.relation(), -constant)
}

impl Expression {
    pub fn normalize(&self) -> CanonicalForm {
        normalize(self)
    }
}

impl Constraint {
    pub fn canonicalize(&self) -> CanonicalConstraint {
        canonicalize(self)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::expr::Relation;

    fn pairs(terms: &IndexMap<String, f64>) -> Vec<(&str, f64)> {
        terms.iter().map(|(s, c)| (s.as_str(), *c)).collect()
    }

    #[test]
    fn constant_sum_folds() {
        let e = Expression::sum(vec![
            Expression::constant(5.0),
            Expression::constant(10.0),
            Expression::constant(100.0),
        ]);
        let form = normalize(&e);
        assert!(form.terms().is_empty());
        assert_eq!(form.constant(), 115.0);
    }

    #[test]
    fn constant_folding_ignores_nesting_shape() {
        let flat = Expression::sum(vec![
            Expression::constant(1.0),
            Expression::constant(2.0),
            Expression::constant(3.0),
            Expression::constant(4.0),
        ]);
        let nested = Expression::sum(vec![
            Expression::sum(vec![Expression::constant(1.0), Expression::constant(2.0)]),
            Expression::sum(vec![
                Expression::constant(3.0),
                Expression::sum(vec![Expression::constant(4.0)]),
            ]),
        ]);
        assert_eq!(normalize(&flat), normalize(&nested));
        assert_eq!(normalize(&nested).constant(), 10.0);
    }

    #[test]
    fn scaled_constant_sum() {
        let e = Expression::sum(vec![
            Expression::constant(5.0),
            Expression::constant(10.0),
            Expression::constant(100.0),
        ]) * 2.0;
        assert_eq!(normalize(&e).constant(), 230.0);
    }

    #[test]
    fn collects_terms_in_first_seen_order() {
        let e = Expression::sum(vec![
            Expression::var("y"),
            Expression::term("x", 2.0),
            Expression::term("y", 3.0),
        ]);
        let form = normalize(&e);
        assert_eq!(pairs(form.terms()), vec![("y", 4.0), ("x", 2.0)]);
    }

    #[test]
    fn cancelled_terms_are_kept() {
        let e = Expression::var("x") + Expression::var("-x") + Expression::var("y");
        let form = normalize(&e);
        assert_eq!(pairs(form.terms()), vec![("x", 0.0), ("y", 1.0)]);
    }

    #[test]
    fn scale_distributes_over_sum() {
        let inner = Expression::sum(vec![
            Expression::sum(vec![Expression::var("x"), Expression::constant(10.0)]),
            Expression::sum(vec![Expression::var("y"), Expression::constant(15.0)]),
        ]);
        let scaled = normalize(&inner.clone().scale(3.0));
        let expected = normalize(&inner).scale(3.0);
        assert_eq!(scaled, expected);
        assert_eq!(scaled.constant(), 75.0);
        assert_eq!(pairs(scaled.terms()), vec![("x", 3.0), ("y", 3.0)]);
    }

    #[test]
    fn equality_moves_constants_right() {
        // 100 = (x + 10) + (y + 15)
        let rhs = Expression::sum(vec![
            Expression::sum(vec![Expression::var("x"), Expression::constant(10.0)]),
            Expression::sum(vec![Expression::var("y"), Expression::constant(15.0)]),
        ]);
        let c = Expression::sum(vec![Expression::constant(100.0)]).eq_expr(rhs);
        let canonical = canonicalize(&c);
        assert_eq!(pairs(canonical.terms()), vec![("x", 1.0), ("y", 1.0)]);
        assert_eq!(canonical.rhs(), 75.0);
        assert_eq!(canonical.relation(), Relation::Equal);
    }

    #[test]
    fn equality_appends_new_left_symbols() {
        // -x = y
        let c = Expression::var("-x").eq_expr(Expression::var("y"));
        let canonical = canonicalize(&c);
        assert_eq!(pairs(canonical.terms()), vec![("y", 1.0), ("x", 1.0)]);
        assert_eq!(canonical.rhs(), 0.0);
    }

    #[test]
    fn greater_or_equal_flips_to_less_equal() {
        // z >= y + 5
        let c = Expression::var("z")
            .ge_expr(Expression::sum(vec![Expression::var("y"), Expression::constant(5.0)]));
        let canonical = canonicalize(&c);
        assert_eq!(pairs(canonical.terms()), vec![("y", 1.0), ("z", -1.0)]);
        assert_eq!(canonical.rhs(), -5.0);
        assert_eq!(canonical.relation(), Relation::LessEqual);
    }

    #[test]
    fn shared_symbols_merge_across_sides() {
        // 2x + 1 >= x + 4  ->  -x <= -3
        let c = (Expression::term("x", 2.0) + Expression::constant(1.0))
            .ge_expr(Expression::var("x") + Expression::constant(4.0));
        let canonical = canonicalize(&c);
        assert_eq!(pairs(canonical.terms()), vec![("x", -1.0)]);
        assert_eq!(canonical.rhs(), -3.0);
    }

    #[test]
    fn pure_constant_constraint_is_degenerate() {
        let c = Expression::constant(3.0).eq_expr(Expression::constant(3.0));
        assert!(canonicalize(&c).is_degenerate());
    }

    #[test]
    fn to_expression_leads_with_constant() {
        let form = normalize(&(Expression::var("x") + Expression::constant(2.0)));
        assert_eq!(
            form.to_expression(),
            Expression::Sum(vec![Expression::constant(2.0), Expression::var("x")])
        );
    }
}
