//! Core expression tree.
//!
//! Nodes are plain values built bottom-up. Scaling folds into constants and
//! variables immediately; a scaled sum stays wrapped until normalization.

use crate::expr::constraint::Constraint;
use crate::expr::error::ExprError;

/// Characters that would collide with the rendered constraint grammar.
const RESERVED_SYMBOL_CHARS: [char; 6] = ['+', '=', '<', ',', '#', '('];

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal numeric term.
    Constant(f64),
    /// Named unknown with an explicit coefficient.
    Variable { symbol: String, coefficient: f64 },
    /// N-ary addition. Term order is kept for rendering and collection.
    Sum(Vec<Expression>),
    /// Lazy scalar multiplication of a sum.
    Scale { inner: Box<Expression>, factor: f64 },
}

impl Expression {
    // ── Constructors ────────────────────────────────────────

    pub fn constant(value: f64) -> Self {
        Expression::Constant(value)
    }

    /// Variable with coefficient 1.0. A leading `-` becomes coefficient -1.0.
    pub fn var(symbol: &str) -> Self {
        Self::term(symbol, 1.0)
    }

    /// Variable with an explicit coefficient.
    ///
    /// A leading `-` on the symbol is stripped and negates the coefficient,
    /// so `term("-x", 2.0)` stores `x` with coefficient -2.0.
    pub fn term(symbol: &str, coefficient: f64) -> Self {
        let symbol = symbol.trim();
        match symbol.strip_prefix('-') {
            Some(rest) => Expression::Variable {
                symbol: rest.trim_start().to_string(),
                coefficient: -coefficient,
            },
            None => Expression::Variable {
                symbol: symbol.to_string(),
                coefficient,
            },
        }
    }

    pub fn sum(terms: Vec<Expression>) -> Self {
        Expression::Sum(terms)
    }

    /// Multiply by a scalar.
    ///
    /// Constants and variables fold eagerly. Sums are wrapped, and an
    /// existing wrapper absorbs the new factor.
    pub fn scale(self, factor: f64) -> Self {
        match self {
            Expression::Constant(value) => Expression::Constant(value * factor),
            Expression::Variable {
                symbol,
                coefficient,
            } => Expression::Variable {
                symbol,
                coefficient: coefficient * factor,
            },
            Expression::Scale {
                inner,
                factor: existing,
            } => Expression::Scale {
                inner,
                factor: existing * factor,
            },
            sum @ Expression::Sum(_) => Expression::Scale {
                inner: Box::new(sum),
                factor,
            },
        }
    }

    // ── Accessors ───────────────────────────────────────────

    /// Symbol of a variable node.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Expression::Variable { symbol, .. } => Some(symbol),
            _ => None,
        }
    }

    /// True when no variable appears anywhere in the tree.
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Constant(_) => true,
            Expression::Variable { .. } => false,
            Expression::Sum(terms) => terms.iter().all(Expression::is_constant),
            Expression::Scale { inner, .. } => inner.is_constant(),
        }
    }

    /// Check that the tree can be rendered and parsed back.
    ///
    /// Rejects non-finite numbers and symbols that are empty, start like a
    /// number, or contain whitespace or grammar characters.
    pub fn validate(&self) -> Result<(), ExprError> {
        match self {
            Expression::Constant(value) => check_finite(*value, "constant"),
            Expression::Variable {
                symbol,
                coefficient,
            } => {
                validate_symbol(symbol)?;
                check_finite(*coefficient, symbol)
            }
            Expression::Sum(terms) => terms.iter().try_for_each(Expression::validate),
            Expression::Scale { inner, factor } => {
                check_finite(*factor, "scale factor")?;
                inner.validate()
            }
        }
    }

    // ── Comparisons (produce Constraint) ────────────────────

    /// `self = rhs`
    pub fn eq_expr(self, rhs: Expression) -> Constraint {
        Constraint::Equality { lhs: self, rhs }
    }

    /// `self >= rhs`
    pub fn ge_expr(self, rhs: Expression) -> Constraint {
        Constraint::GreaterOrEqual { lhs: self, rhs }
    }

    /// `self <= rhs`, stored with the sides swapped.
    pub fn le_expr(self, rhs: Expression) -> Constraint {
        Constraint::GreaterOrEqual { lhs: rhs, rhs: self }
    }
}

fn check_finite(value: f64, what: &str) -> Result<(), ExprError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ExprError::MalformedExpression {
            detail: format!("non-finite value {value} for {what}"),
        })
    }
}

/// Check that a variable symbol survives the rendered text grammar.
pub fn validate_symbol(symbol: &str) -> Result<(), ExprError> {
    let malformed = |reason: &str| ExprError::MalformedExpression {
        detail: format!("symbol '{symbol}' {reason}"),
    };
    let Some(first) = symbol.chars().next() else {
        return Err(malformed("is empty"));
    };
    if first.is_ascii_digit() || first == '.' || first == '-' {
        return Err(malformed("starts like a number"));
    }
    if symbol.chars().any(char::is_whitespace) {
        return Err(malformed("contains whitespace"));
    }
    if symbol.contains(RESERVED_SYMBOL_CHARS) {
        return Err(malformed("contains a reserved character"));
    }
    Ok(())
}

impl Constraint {
    /// Validate both sides.
    pub fn validate(&self) -> Result<(), ExprError> {
        self.lhs().validate()?;
        self.rhs().validate()
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::Constant(value)
    }
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Expression) -> Self::Output {
        match self {
            Expression::Sum(mut terms) => {
                terms.push(rhs);
                Expression::Sum(terms)
            }
            lhs => Expression::Sum(vec![lhs, rhs]),
        }
    }
}

impl std::ops::Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Expression) -> Self::Output {
        self + rhs.scale(-1.0)
    }
}

impl std::ops::Mul<f64> for Expression {
    type Output = Expression;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::Expression;
    use crate::expr::Constraint;

    #[test]
    fn negated_symbol_folds_into_coefficient() {
        let e = Expression::var("-x");
        assert_eq!(
            e,
            Expression::Variable {
                symbol: "x".to_string(),
                coefficient: -1.0
            }
        );
    }

    #[test]
    fn negated_symbol_multiplies_explicit_coefficient() {
        let e = Expression::term("-flow", 2.5);
        assert_eq!(e.symbol(), Some("flow"));
        match e {
            Expression::Variable { coefficient, .. } => assert_eq!(coefficient, -2.5),
            other => panic!("expected variable, got {other:?}"),
        }
    }

    #[test]
    fn scale_folds_constant() {
        assert_eq!(
            Expression::constant(2.0).scale(-4.5),
            Expression::Constant(-9.0)
        );
    }

    #[test]
    fn scale_folds_variable() {
        let e = Expression::var("-x").scale(4.5);
        match e {
            Expression::Variable {
                symbol,
                coefficient,
            } => {
                assert_eq!(symbol, "x");
                assert_eq!(coefficient, -4.5);
            }
            other => panic!("expected variable, got {other:?}"),
        }
    }

    #[test]
    fn scale_wraps_sum() {
        let sum = Expression::sum(vec![Expression::constant(5.0), Expression::constant(10.0)]);
        let scaled = sum.clone().scale(2.0);
        assert_eq!(
            scaled,
            Expression::Scale {
                inner: Box::new(sum),
                factor: 2.0
            }
        );
    }

    #[test]
    fn nested_scale_multiplies_factors() {
        let sum = Expression::sum(vec![Expression::var("x")]);
        let scaled = sum.scale(2.0).scale(3.0);
        match scaled {
            Expression::Scale { factor, .. } => assert_eq!(factor, 6.0),
            other => panic!("expected scale, got {other:?}"),
        }
    }

    #[test]
    fn add_appends_to_left_sum() {
        let e = Expression::var("x") + Expression::constant(1.0) + Expression::var("y");
        match e {
            Expression::Sum(terms) => assert_eq!(terms.len(), 3),
            other => panic!("expected sum, got {other:?}"),
        }
    }

    #[test]
    fn sub_negates_right_side() {
        let e = Expression::var("x") - Expression::var("y");
        assert_eq!(
            e,
            Expression::Sum(vec![Expression::var("x"), Expression::var("-y")])
        );
    }

    #[test]
    fn is_constant_walks_tree() {
        let e = Expression::sum(vec![Expression::constant(1.0), Expression::constant(2.0)]) * 3.0;
        assert!(e.is_constant());
        assert!(!(e + Expression::var("x")).is_constant());
    }

    #[test]
    fn validate_accepts_plain_symbols() {
        let e = Expression::var("x12") + Expression::var("-tank_a") + Expression::constant(3.0);
        assert!(e.validate().is_ok());
    }

    #[test]
    fn validate_rejects_grammar_breaking_symbols() {
        for symbol in ["", "1x", "a b", "a+b", "q=1", "-"] {
            let e = Expression::var(symbol);
            let err = e.validate().unwrap_err();
            assert_eq!(err.code(), "EXPR_MALFORMED", "symbol {symbol:?}");
        }
    }

    #[test]
    fn validate_rejects_non_finite_numbers() {
        assert!(Expression::constant(f64::NAN).validate().is_err());
        let e = Expression::sum(vec![Expression::var("x")]) * f64::INFINITY;
        assert!(e.validate().is_err());
    }

    #[test]
    fn le_expr_swaps_sides() {
        let c = Expression::var("x").le_expr(Expression::constant(4.0));
        assert_eq!(
            c,
            Constraint::GreaterOrEqual {
                lhs: Expression::constant(4.0),
                rhs: Expression::var("x"),
            }
        );
    }
}
