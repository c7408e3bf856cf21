//! Solver output parsing.
//!
//! The solver writes the objective value on the first line (or `no` when
//! the problem is infeasible) followed by one `<name>,<value>` line per
//! column.

use std::time::Instant;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::LpError;

const INFEASIBLE_MARKER: &str = "no";

/// Objective value and solved value per variable, in solver output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    objective: f64,
    values: IndexMap<String, f64>,
}

impl Solution {
    pub fn new(objective: f64, values: IndexMap<String, f64>) -> Self {
        Self { objective, values }
    }

    pub fn objective_value(&self) -> f64 {
        self.objective
    }

    pub fn value(&self, symbol: &str) -> Option<f64> {
        self.values.get(symbol).copied()
    }

    pub fn values(&self) -> &IndexMap<String, f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_parts(self) -> (f64, IndexMap<String, f64>) {
        (self.objective, self.values)
    }
}

/// Parse solver output lines.
///
/// Every malformed line fails with its 1-based line number; nothing is
/// skipped.
pub fn parse_solution<S: AsRef<str>>(lines: &[S]) -> Result<Solution, LpError> {
    let started = Instant::now();
    let Some(first) = lines.first() else {
        return Err(LpError::EmptySolverOutput);
    };

    let first = first.as_ref().trim();
    if first == INFEASIBLE_MARKER {
        tracing::debug!(
            component = "solution",
            operation = "parse",
            status = "infeasible",
            "Solver reported infeasible problem"
        );
        return Err(LpError::Infeasible);
    }
    let objective = parse_value(first).ok_or_else(|| LpError::UnparsableSolverLine {
        line_number: 1,
        line: first.to_string(),
    })?;

    let mut values = IndexMap::with_capacity(lines.len() - 1);
    for (idx, line) in lines.iter().enumerate().skip(1) {
        let (name, value) = parse_value_line(line.as_ref()).ok_or_else(|| {
            LpError::UnparsableSolverLine {
                line_number: idx + 1,
                line: line.as_ref().to_string(),
            }
        })?;
        values.insert(name.to_string(), value);
    }

    tracing::debug!(
        component = "solution",
        operation = "parse",
        status = "success",
        variables = values.len(),
        objective,
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Parsed solver output"
    );

    Ok(Solution { objective, values })
}

/// Parse the full text of a solver output file.
pub fn parse_solution_text(text: &str) -> Result<Solution, LpError> {
    let lines: Vec<&str> = text.lines().collect();
    parse_solution(&lines)
}

fn parse_value_line(line: &str) -> Option<(&str, f64)> {
    let (name, value) = line.split_once(',')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, parse_value(value.trim())?))
}

fn parse_value(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}
