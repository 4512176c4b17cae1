pub mod exact;
pub mod runner;
pub mod sampling;

pub use exact::ExactSolver;
pub use runner::{solve_with_deadline, SolveFailure};
pub use sampling::SamplingSolver;

use std::sync::Arc;

use crate::config::{SolverConfig, SolverStrategy};
use crate::engines::encoding::QuboProblem;
use crate::error::Result;

/// A complete assignment and its objective value. Each solve attempt
/// produces a fresh value; results are never patched in place.
#[derive(Debug, Clone)]
pub struct SolverSolution {
    pub assignment: Vec<bool>,
    pub objective_value: f64,
}

/// A QUBO minimizer. Implementations must be self-contained: the
/// deadline runner abandons them on timeout, so they get no
/// cancellation hook and must not hold external resources.
pub trait QuboSolver: Send + Sync {
    fn name(&self) -> &'static str;
    fn solve(&self, problem: &QuboProblem) -> Result<SolverSolution>;
}

/// Construct the configured strategy. Selection happens here, once,
/// never per call.
pub fn build_solver(config: &SolverConfig) -> Arc<dyn QuboSolver> {
    match config.strategy {
        SolverStrategy::Exact => Arc::new(ExactSolver::new(config.max_exact_variables)),
        SolverStrategy::Sampling => Arc::new(SamplingSolver::new(
            config.max_iterations,
            config.restarts,
            config.seed,
        )),
    }
}
