//! Per-variable upper bounds from `<name> <= <value>` descriptors.

use indexmap::IndexMap;

use crate::error::LpError;
use crate::registry::VariableRegistry;

/// Written in place of a missing upper bound in solver files.
pub const UNSPECIFIED_BOUND: f64 = -1.0;

const BOUND_OPERATOR: &str = "<=";

/// Upper bound per symbol; `None` means no bound was supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundsTable {
    upper: IndexMap<String, Option<f64>>,
}

impl BoundsTable {
    /// Explicit bound for `symbol`, if any.
    pub fn upper(&self, symbol: &str) -> Option<f64> {
        self.upper.get(symbol).copied().flatten()
    }

    /// Bound for `symbol` with the `-1.0` sentinel for unspecified.
    pub fn upper_or_sentinel(&self, symbol: &str) -> f64 {
        self.upper(symbol).unwrap_or(UNSPECIFIED_BOUND)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.upper.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.upper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.upper.iter().map(|(name, bound)| (name.as_str(), *bound))
    }

    /// Wire view: every symbol with the sentinel substituted.
    pub fn sentinel_values(&self) -> IndexMap<String, f64> {
        self.upper
            .iter()
            .map(|(name, bound)| (name.clone(), bound.unwrap_or(UNSPECIFIED_BOUND)))
            .collect()
    }

    /// Bounds file lines: `<name> <= <upper>`.
    pub fn to_lines(&self) -> Vec<String> {
        self.upper
            .iter()
            .map(|(name, bound)| {
                format!(
                    "{name} {BOUND_OPERATOR} {}",
                    blueark_expr::format_number(bound.unwrap_or(UNSPECIFIED_BOUND))
                )
            })
            .collect()
    }
}

/// Parse one `<name> <= <value>` descriptor.
pub fn parse_bound_descriptor(index: usize, descriptor: &str) -> Result<(String, f64), LpError> {
    let unparsable = || LpError::UnparsableBoundDescriptor {
        index,
        descriptor: descriptor.to_string(),
    };
    let (name, value) = descriptor.split_once(BOUND_OPERATOR).ok_or_else(unparsable)?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(unparsable());
    }
    let value = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(unparsable)?;
    Ok((name.to_string(), value))
}

/// True for a bound line rather than a rendered constraint.
///
/// Rendered constraints always start with a numeric coefficient; bound
/// descriptors start with the variable name.
pub fn is_bound_descriptor(line: &str) -> bool {
    let line = line.trim_start();
    let starts_numeric = line
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '.');
    !starts_numeric && line.contains(BOUND_OPERATOR) && !line.contains(" + ")
}

/// Separate a step's raw equation list into constraints and bound lines.
pub fn split_descriptors<S: AsRef<str>>(lines: &[S]) -> (Vec<String>, Vec<String>) {
    let mut constraints = Vec::new();
    let mut bounds = Vec::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        if is_bound_descriptor(line) {
            bounds.push(line.to_string());
        } else {
            constraints.push(line.to_string());
        }
    }
    (constraints, bounds)
}

/// Build the bounds table over the registry's columns.
///
/// Columns come first in registry order, each with its explicit bound or
/// `None`. Descriptors naming symbols outside the registry are kept after
/// them. A repeated descriptor overrides the earlier one.
pub fn build_bounds<S: AsRef<str>>(
    descriptors: &[S],
    registry: &VariableRegistry,
) -> Result<BoundsTable, LpError> {
    let mut explicit: IndexMap<String, f64> = IndexMap::new();
    for (index, descriptor) in descriptors.iter().enumerate() {
        let (name, value) = parse_bound_descriptor(index, descriptor.as_ref())?;
        explicit.insert(name, value);
    }

    let mut upper: IndexMap<String, Option<f64>> = registry
        .iter()
        .map(|symbol| (symbol.to_string(), explicit.get(symbol).copied()))
        .collect();
    let mut unknown = 0usize;
    for (name, value) in explicit {
        if !upper.contains_key(&name) {
            unknown += 1;
            upper.insert(name, Some(value));
        }
    }

    tracing::debug!(
        component = "bounds",
        operation = "build",
        status = "success",
        descriptors = descriptors.len(),
        columns = registry.len(),
        unknown_symbols = unknown,
        "Built bounds table"
    );

    Ok(BoundsTable { upper })
}
