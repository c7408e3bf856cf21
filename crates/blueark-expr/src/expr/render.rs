//! Deterministic text form of expressions and constraints.
//!
//! The constraint form `1.0x + -1.0y <= 10.0` is read back by
//! [`parse_rendered`](crate::expr::parse_rendered), so its grammar is fixed:
//! - numbers always carry a fractional part (`75.0`, `-4.5`)
//! - variables render as coefficient then symbol, even for 1.0 and -1.0
//! - terms are joined by `" + "`, negative values keep their sign
//! - a still-lazy scale renders as `k(inner)`

use std::fmt;

use crate::expr::canonical::CanonicalForm;
use crate::expr::constraint::{CanonicalConstraint, Constraint, Relation};
use crate::expr::core::Expression;

const TERM_SEPARATOR: &str = " + ";

/// Shortest round-trip decimal, always with a fractional digit.
///
/// Negative zero prints as `0.0`.
pub fn format_number(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    let text = value.to_string();
    if !value.is_finite() || text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

fn write_terms<'a, I>(f: &mut fmt::Formatter<'_>, terms: I) -> fmt::Result
where
    I: IntoIterator<Item = (&'a String, &'a f64)>,
{
    for (idx, (symbol, coefficient)) in terms.into_iter().enumerate() {
        if idx > 0 {
            f.write_str(TERM_SEPARATOR)?;
        }
        write!(f, "{}{}", format_number(*coefficient), symbol)?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(value) => f.write_str(&format_number(*value)),
            Expression::Variable {
                symbol,
                coefficient,
            } => write!(f, "{}{}", format_number(*coefficient), symbol),
            Expression::Sum(terms) => {
                if terms.is_empty() {
                    return f.write_str(&format_number(0.0));
                }
                for (idx, term) in terms.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(TERM_SEPARATOR)?;
                    }
                    write!(f, "{term}")?;
                }
                Ok(())
            }
            Expression::Scale { inner, factor } => {
                write!(f, "{}({})", format_number(*factor), inner)
            }
        }
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_number(self.constant()))?;
        if !self.terms().is_empty() {
            f.write_str(TERM_SEPARATOR)?;
            write_terms(f, self.terms())?;
        }
        Ok(())
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CanonicalConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms().is_empty() {
            f.write_str(&format_number(0.0))?;
        } else {
            write_terms(f, self.terms())?;
        }
        write!(f, " {} {}", self.relation(), format_number(self.rhs()))
    }
}

/// Constraints display in canonical form.
impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonicalize())
    }
}

#[cfg(test)]
mod tests {
    use super::format_number;
    use crate::expr::{Expression, normalize};

    fn x_plus_10_y_plus_15() -> Expression {
        Expression::sum(vec![
            Expression::sum(vec![Expression::var("x"), Expression::constant(10.0)]),
            Expression::sum(vec![Expression::var("y"), Expression::constant(15.0)]),
        ])
    }

    #[test]
    fn numbers_keep_one_fractional_digit() {
        assert_eq!(format_number(75.0), "75.0");
        assert_eq!(format_number(-5.0), "-5.0");
        assert_eq!(format_number(-4.5), "-4.5");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-0.0), "0.0");
        assert_eq!(format_number(1e21), "1000000000000000000000.0");
    }

    #[test]
    fn sum_renders_terms_in_order() {
        let sum = Expression::sum(vec![Expression::constant(5.0), Expression::constant(10.0)]);
        assert_eq!(sum.to_string(), "5.0 + 10.0");
        assert_eq!(sum.scale(2.0).to_string(), "2.0(5.0 + 10.0)");
    }

    #[test]
    fn single_term_sum_renders_alone() {
        assert_eq!(
            Expression::sum(vec![Expression::var("x")]).to_string(),
            "1.0x"
        );
        assert_eq!(Expression::sum(Vec::new()).to_string(), "0.0");
    }

    #[test]
    fn folded_scale_renders_plain() {
        assert_eq!(Expression::var("-x").scale(4.5).to_string(), "-4.5x");
        assert_eq!(Expression::constant(2.0).scale(-4.5).to_string(), "-9.0");
    }

    #[test]
    fn nested_sum_renders_flat() {
        assert_eq!(
            x_plus_10_y_plus_15().to_string(),
            "1.0x + 10.0 + 1.0y + 15.0"
        );
    }

    #[test]
    fn canonical_form_leads_with_constant() {
        let e = x_plus_10_y_plus_15();
        assert_eq!(normalize(&e).to_string(), "25.0 + 1.0x + 1.0y");
        assert_eq!(normalize(&e.scale(3.0)).to_string(), "75.0 + 3.0x + 3.0y");
    }

    #[test]
    fn pure_constant_form_renders_constant() {
        let e = Expression::sum(vec![
            Expression::constant(5.0),
            Expression::constant(10.0),
            Expression::constant(100.0),
        ]);
        assert_eq!(normalize(&e).to_string(), "115.0");
    }

    #[test]
    fn constraints_render_canonically() {
        let c = Expression::sum(vec![Expression::constant(100.0)]).eq_expr(x_plus_10_y_plus_15());
        assert_eq!(c.to_string(), "1.0x + 1.0y = 75.0");

        let c = Expression::var("-x").eq_expr(Expression::var("y"));
        assert_eq!(c.to_string(), "1.0y + 1.0x = 0.0");

        let c = Expression::var("z")
            .ge_expr(Expression::sum(vec![Expression::var("y"), Expression::constant(5.0)]));
        assert_eq!(c.to_string(), "1.0y + -1.0z <= -5.0");

        let lhs = Expression::sum(vec![
            Expression::var("z"),
            Expression::constant(10.0),
            Expression::constant(5.0),
        ]);
        let rhs = Expression::sum(vec![
            Expression::var("x"),
            Expression::var("-y"),
            Expression::constant(5.0),
        ]);
        assert_eq!(lhs.ge_expr(rhs).to_string(), "1.0x + -1.0y + -1.0z <= 10.0");
    }

    #[test]
    fn zero_coefficients_still_render() {
        let c = (Expression::var("x") + Expression::var("-x"))
            .eq_expr(Expression::var("y") + Expression::constant(1.0));
        assert_eq!(c.to_string(), "1.0y + 0.0x = -1.0");
    }

    #[test]
    fn degenerate_constraint_renders_zero_lhs() {
        let c = Expression::constant(1.0).ge_expr(Expression::constant(3.0));
        assert_eq!(c.to_string(), "0.0 <= -2.0");
    }
}
