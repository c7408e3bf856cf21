//! Turbine output weights from `<value>x<id>` descriptors.

use indexmap::IndexMap;

use crate::error::LpError;
use crate::registry::VariableRegistry;

/// Separator between the value and the turbine id; also the column prefix.
pub const TURBINE_SEPARATOR: char = 'x';

/// Objective weight per column. Columns without a turbine weigh 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurbineTable {
    weights: IndexMap<String, f64>,
}

impl TurbineTable {
    pub fn weight(&self, symbol: &str) -> f64 {
        self.weights.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.weights.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(name, weight)| (name.as_str(), *weight))
    }

    pub fn as_map(&self) -> &IndexMap<String, f64> {
        &self.weights
    }
}

/// Parse `"3.5x12"` into `("x12", 3.5)`.
pub fn parse_turbine_descriptor(index: usize, descriptor: &str) -> Result<(String, f64), LpError> {
    let unparsable = || LpError::UnparsableTurbineDescriptor {
        index,
        descriptor: descriptor.to_string(),
    };
    let trimmed = descriptor.trim();
    let (value, id) = trimmed
        .split_once(TURBINE_SEPARATOR)
        .ok_or_else(unparsable)?;
    if id.is_empty() || id.contains(TURBINE_SEPARATOR) || id.contains(char::is_whitespace) {
        return Err(unparsable());
    }
    let value = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(unparsable)?;
    Ok((format!("{TURBINE_SEPARATOR}{id}"), value))
}

/// Build turbine weights: descriptors first in their order, then every
/// remaining registry column at 0.0.
pub fn build_turbine_table<S: AsRef<str>>(
    descriptors: &[S],
    registry: &VariableRegistry,
) -> Result<TurbineTable, LpError> {
    let mut weights = IndexMap::new();
    for (index, descriptor) in descriptors.iter().enumerate() {
        let (name, value) = parse_turbine_descriptor(index, descriptor.as_ref())?;
        weights.insert(name, value);
    }
    let turbines = weights.len();
    for symbol in registry.iter() {
        weights.entry(symbol.to_string()).or_insert(0.0);
    }

    tracing::debug!(
        component = "turbine",
        operation = "build",
        status = "success",
        turbines,
        columns = registry.len(),
        "Built turbine table"
    );

    Ok(TurbineTable { weights })
}
