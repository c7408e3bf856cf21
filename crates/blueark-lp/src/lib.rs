//! Solver input and output for blueark simulation steps.
//!
//! Canonical constraints from `blueark-expr` become a dense matrix indexed by
//! a per-step variable registry, alongside bounds and turbine tables. These
//! are written to the files the external solver reads, and its textual
//! output is parsed back into named values.
//!
//! # Overview
//!
//! - [`VariableRegistry`]: first-seen column ordering
//! - [`Matrix`]: coefficients, right-hand sides and relations
//! - [`BoundsTable`] / [`TurbineTable`]: per-column descriptor tables
//! - [`Solution`]: parsed solver output
//! - [`SolverBackend`]: trait for running the external solver
//! - [`solve_step`]: the whole pipeline for one step

mod backend;
mod bounds;
mod config;
mod error;
mod files;
mod matrix;
mod registry;
mod solution;
mod step;
mod turbine;

pub use backend::{SolutionFileBackend, SolverBackend};
pub use bounds::{
    BoundsTable, UNSPECIFIED_BOUND, build_bounds, is_bound_descriptor, parse_bound_descriptor,
    split_descriptors,
};
pub use config::{CompileConfig, DegenerateRows};
pub use error::LpError;
pub use files::{
    SolverFiles, format_bounds_file, format_matrix_file, format_variables_file,
    read_solution_lines, write_solver_inputs,
};
pub use matrix::{Matrix, build_matrix};
pub use registry::VariableRegistry;
pub use solution::{Solution, parse_solution, parse_solution_text};
pub use step::{CompiledStep, StepProblem, solve_step};
pub use turbine::{
    TURBINE_SEPARATOR, TurbineTable, build_turbine_table, parse_turbine_descriptor,
};
