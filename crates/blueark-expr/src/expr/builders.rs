//! Builder functions for constructing expression trees.

use crate::expr::core::Expression;

/// Sum of `coefficient * symbol` terms plus a constant.
///
/// The constant is placed last, after the terms, matching how mass-balance
/// rows are usually written (`inflow + -outflow + level`).
pub fn linear_terms<S: AsRef<str>>(terms: &[(S, f64)], constant: f64) -> Expression {
    let mut nodes: Vec<Expression> = terms
        .iter()
        .map(|(symbol, coefficient)| Expression::term(symbol.as_ref(), *coefficient))
        .collect();
    if constant != 0.0 {
        nodes.push(Expression::Constant(constant));
    }
    Expression::Sum(nodes)
}

/// Combines multiple expressions into a single sum, flattening nested sums.
///
/// Term order is preserved. Duplicate symbols are NOT merged here; that
/// happens during normalization.
pub fn linear_sum(exprs: Vec<Expression>) -> Expression {
    let mut nodes = Vec::with_capacity(exprs.len());
    for expr in exprs {
        match expr {
            Expression::Sum(inner) => nodes.extend(inner),
            other => nodes.push(other),
        }
    }
    Expression::Sum(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_terms_skips_zero_constant() {
        let e = linear_terms(&[("x", 2.0), ("-y", 1.0)], 0.0);
        assert_eq!(e.to_string(), "2.0x + -1.0y");
    }

    #[test]
    fn linear_terms_appends_constant() {
        let e = linear_terms(&[("tank", 1.0)], 40.0);
        assert_eq!(e.to_string(), "1.0tank + 40.0");
    }

    #[test]
    fn linear_sum_flattens_and_keeps_order() {
        let left = Expression::var("a") + Expression::constant(1.0);
        let right = Expression::var("b");
        let summed = linear_sum(vec![left, right, Expression::var("a")]);
        match &summed {
            Expression::Sum(nodes) => assert_eq!(nodes.len(), 4),
            other => panic!("expected sum, got {other:?}"),
        }
        assert_eq!(summed.to_string(), "1.0a + 1.0 + 1.0b + 1.0a");
        assert_eq!(summed.normalize().to_string(), "1.0 + 2.0a + 1.0b");
    }
}
