//! One simulation step: constraints in, solved values out.

use std::time::Instant;

use blueark_expr::Constraint;

use crate::backend::SolverBackend;
use crate::bounds::{BoundsTable, build_bounds};
use crate::config::CompileConfig;
use crate::error::LpError;
use crate::files::{SolverFiles, write_solver_inputs};
use crate::matrix::Matrix;
use crate::solution::{Solution, parse_solution};
use crate::turbine::{TurbineTable, build_turbine_table};

/// Everything the outer loop supplies for one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepProblem {
    pub constraints: Vec<Constraint>,
    /// `<name> <= <value>` descriptors.
    pub bounds: Vec<String>,
    /// `<value>x<id>` descriptors.
    pub turbines: Vec<String>,
}

/// Solver input for one step, before any file is written.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStep {
    pub matrix: Matrix,
    pub bounds: BoundsTable,
    pub turbines: TurbineTable,
}

impl StepProblem {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self {
            constraints,
            ..Default::default()
        }
    }

    pub fn with_bounds<S: Into<String>>(mut self, bounds: impl IntoIterator<Item = S>) -> Self {
        self.bounds = bounds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_turbines<S: Into<String>>(
        mut self,
        turbines: impl IntoIterator<Item = S>,
    ) -> Self {
        self.turbines = turbines.into_iter().map(Into::into).collect();
        self
    }

    /// Canonicalize, build the matrix and the per-column tables.
    pub fn compile(&self, config: &CompileConfig) -> Result<CompiledStep, LpError> {
        let matrix = Matrix::from_constraints(&self.constraints, config.degenerate_rows)?;
        let bounds = build_bounds(&self.bounds, matrix.registry())?;
        let turbines = build_turbine_table(&self.turbines, matrix.registry())?;
        Ok(CompiledStep {
            matrix,
            bounds,
            turbines,
        })
    }
}

impl CompiledStep {
    pub fn write(&self, config: &CompileConfig) -> Result<SolverFiles, LpError> {
        write_solver_inputs(config, &self.matrix, &self.bounds, &self.turbines)
    }
}

/// Compile a step, write its solver files, run the backend and parse the
/// result.
///
/// A backend failure is reported as `LpError::SolverFailed`; the caller
/// decides whether to retry the step.
pub fn solve_step<B: SolverBackend>(
    problem: &StepProblem,
    config: &CompileConfig,
    backend: &mut B,
) -> Result<Solution, LpError> {
    let started = Instant::now();
    let compiled = problem.compile(config)?;
    let files = compiled.write(config)?;

    let output = backend.solve(&files).map_err(|err| {
        tracing::debug!(
            component = "step",
            operation = "solve",
            status = "error",
            backend = backend.name(),
            error = %err,
            "Solver backend failed"
        );
        LpError::SolverFailed {
            detail: err.to_string(),
        }
    })?;
    let solution = parse_solution(&output)?;

    tracing::debug!(
        component = "step",
        operation = "solve",
        status = "success",
        backend = backend.name(),
        rows = compiled.matrix.num_rows(),
        columns = compiled.matrix.num_columns(),
        objective = solution.objective_value(),
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Solved step"
    );

    Ok(solution)
}
