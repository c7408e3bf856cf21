//! Stable variable → column ordering for one step.

use blueark_expr::CanonicalConstraint;
use indexmap::IndexSet;

/// Distinct symbols in first-seen order across constraints.
///
/// Rebuilt for every step; matrix rows and bound/turbine tables are indexed
/// against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableRegistry {
    columns: IndexSet<String>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan constraints in submission order, terms in their own order.
    pub fn from_constraints<'a, I>(constraints: I) -> Self
    where
        I: IntoIterator<Item = &'a CanonicalConstraint>,
    {
        let mut registry = Self::new();
        for constraint in constraints {
            for symbol in constraint.terms().keys() {
                registry.register(symbol);
            }
        }
        registry
    }

    /// Register a symbol, returning its column index.
    pub fn register(&mut self, symbol: &str) -> usize {
        match self.columns.get_index_of(symbol) {
            Some(idx) => idx,
            None => self.columns.insert_full(symbol.to_string()).0,
        }
    }

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.columns.get_index_of(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.columns.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.columns.iter().cloned().collect()
    }
}
