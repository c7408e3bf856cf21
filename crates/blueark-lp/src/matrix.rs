//! Dense constraint matrix for one step.

use std::time::Instant;

use blueark_expr::{CanonicalConstraint, Constraint, Relation, canonicalize, parse_rendered};

use crate::config::DegenerateRows;
use crate::error::LpError;
use crate::registry::VariableRegistry;

/// Rows × columns coefficients with per-row relation and constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: Vec<Vec<f64>>,
    rhs: Vec<f64>,
    relations: Vec<Relation>,
    registry: VariableRegistry,
}

impl Matrix {
    /// Build from constraint trees, one row per constraint in order.
    pub fn from_constraints(
        constraints: &[Constraint],
        degenerate_rows: DegenerateRows,
    ) -> Result<Self, LpError> {
        let mut canonical = Vec::with_capacity(constraints.len());
        for constraint in constraints {
            constraint.validate()?;
            canonical.push(canonicalize(constraint));
        }
        Self::from_canonical(canonical, degenerate_rows)
    }

    /// Build from rendered canonical constraint lines.
    pub fn from_rendered<S: AsRef<str>>(
        lines: &[S],
        degenerate_rows: DegenerateRows,
    ) -> Result<Self, LpError> {
        let canonical = lines
            .iter()
            .map(|line| parse_rendered(line.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_canonical(canonical, degenerate_rows)
    }

    /// Build from canonical constraints.
    pub fn from_canonical(
        constraints: Vec<CanonicalConstraint>,
        degenerate_rows: DegenerateRows,
    ) -> Result<Self, LpError> {
        let started = Instant::now();

        if degenerate_rows == DegenerateRows::Reject {
            if let Some((row, constraint)) = constraints
                .iter()
                .enumerate()
                .find(|(_, c)| c.is_degenerate())
            {
                tracing::debug!(
                    component = "matrix",
                    operation = "build",
                    status = "error",
                    row,
                    "Rejected degenerate constraint"
                );
                return Err(LpError::DegenerateConstraint {
                    row,
                    rendered: constraint.to_string(),
                });
            }
        }

        let registry = VariableRegistry::from_constraints(&constraints);
        let mut rows = Vec::with_capacity(constraints.len());
        let mut rhs = Vec::with_capacity(constraints.len());
        let mut relations = Vec::with_capacity(constraints.len());

        for constraint in constraints {
            let row = registry
                .iter()
                .map(|symbol| constraint.coefficient(symbol).unwrap_or(0.0))
                .collect();
            rows.push(row);
            rhs.push(constraint.rhs());
            relations.push(constraint.relation());
        }

        tracing::debug!(
            component = "matrix",
            operation = "build",
            status = "success",
            rows = rows.len(),
            columns = registry.len(),
            degenerate_rows = degenerate_rows.as_str(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Built constraint matrix"
        );

        Ok(Self {
            rows,
            rhs,
            relations,
            registry,
        })
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn columns(&self) -> Vec<String> {
        self.registry.to_vec()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.registry.len()
    }

    /// Coefficient of `symbol` in `row`, 0.0 when absent from that row.
    pub fn coefficient(&self, row: usize, symbol: &str) -> Option<f64> {
        let column = self.registry.index_of(symbol)?;
        self.rows.get(row).map(|r| r[column])
    }

    /// Consume into `(matrix, rhs, relations, columns)`.
    pub fn into_parts(self) -> (Vec<Vec<f64>>, Vec<f64>, Vec<Relation>, Vec<String>) {
        let columns = self.registry.to_vec();
        (self.rows, self.rhs, self.relations, columns)
    }
}

/// Build a matrix, rejecting degenerate constraints.
pub fn build_matrix(constraints: &[Constraint]) -> Result<Matrix, LpError> {
    Matrix::from_constraints(constraints, DegenerateRows::Reject)
}
