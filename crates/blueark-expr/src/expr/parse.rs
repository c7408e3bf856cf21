//! Parse canonical constraint text back into collected terms.

use indexmap::IndexMap;

use crate::expr::constraint::{CanonicalConstraint, Relation};
use crate::expr::core::validate_symbol;
use crate::expr::error::ExprError;

/// Parse `"<terms> <relation> <constant>"` as produced by rendering a
/// canonical constraint.
///
/// Repeated symbols are summed. A bare numeric term on the left is moved to
/// the right-hand constant, which is how a degenerate `0.0 = 4.0` reads back
/// with no terms.
pub fn parse_rendered(input: &str) -> Result<CanonicalConstraint, ExprError> {
    let text = input.trim();
    let unparsable = |reason: String| ExprError::UnparsableRendered {
        input: text.to_string(),
        reason,
    };

    let (lhs, relation, rhs) = if let Some((lhs, rhs)) = text.split_once(" <= ") {
        (lhs, Relation::LessEqual, rhs)
    } else if let Some((lhs, rhs)) = text.split_once(" = ") {
        (lhs, Relation::Equal, rhs)
    } else {
        return Err(unparsable("missing relation".to_string()));
    };

    let mut constant = parse_number(rhs.trim())
        .ok_or_else(|| unparsable(format!("right-hand side '{}' is not a number", rhs.trim())))?;

    let mut terms: IndexMap<String, f64> = IndexMap::new();
    for token in lhs.split(" + ").map(str::trim) {
        let (coefficient, symbol) =
            split_term(token).ok_or_else(|| unparsable(format!("bad term '{token}'")))?;
        if symbol.is_empty() {
            constant -= coefficient;
            continue;
        }
        validate_symbol(symbol).map_err(|err| unparsable(err.to_string()))?;
        *terms.entry(symbol.to_string()).or_insert(0.0) += coefficient;
    }

    Ok(CanonicalConstraint::new(terms, relation, constant))
}

/// Split a rendered term into its numeric prefix and symbol suffix.
fn split_term(token: &str) -> Option<(f64, &str)> {
    let bytes = token.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        let fraction_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end == fraction_start {
            return None;
        }
    }
    let coefficient = parse_number(&token[..end])?;
    Some((coefficient, &token[end..]))
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}
