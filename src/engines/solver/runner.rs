use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::engines::encoding::QuboProblem;
use crate::error::QuantfolioError;
use crate::types::SolverStatus;

use super::{QuboSolver, SolverSolution};

/// Why a deadline-bounded solve attempt produced no usable solution.
#[derive(Debug, Clone)]
pub enum SolveFailure {
    /// The deadline fired first; the solver thread was abandoned.
    Timeout { budget: Duration },
    /// The solver returned an error or its thread died.
    Execution(String),
}

impl SolveFailure {
    pub fn status(&self) -> SolverStatus {
        match self {
            Self::Timeout { .. } => SolverStatus::TimedOut,
            Self::Execution(_) => SolverStatus::Failed,
        }
    }
}

impl std::fmt::Display for SolveFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { budget } => {
                write!(f, "solver exceeded its {:.1}s budget", budget.as_secs_f64())
            }
            Self::Execution(detail) => write!(f, "solver execution failed: {}", detail),
        }
    }
}

impl From<SolveFailure> for QuantfolioError {
    fn from(failure: SolveFailure) -> Self {
        match failure {
            SolveFailure::Timeout { budget } => QuantfolioError::SolverTimeout {
                budget_secs: budget.as_secs(),
            },
            SolveFailure::Execution(detail) => QuantfolioError::SolverExecution(detail),
        }
    }
}

/// Run one solve attempt with a hard wall-clock budget.
///
/// The solve runs on its own named thread and reports through a
/// channel; the caller waits at most `budget`. On timeout the thread is
/// abandoned, never joined: the solver has no cancellation hook, and
/// past the deadline its result no longer matters. A panicking solver
/// drops the sender, which surfaces as an execution failure rather
/// than a hang.
pub fn solve_with_deadline(
    solver: Arc<dyn QuboSolver>,
    problem: QuboProblem,
    budget: Duration,
) -> std::result::Result<SolverSolution, SolveFailure> {
    let (tx, rx) = mpsc::channel();
    let solver_name = solver.name();

    let spawned = thread::Builder::new()
        .name(format!("{}-solve", solver_name))
        .spawn(move || {
            let result = solver.solve(&problem);
            let _ = tx.send(result);
        });

    if let Err(e) = spawned {
        return Err(SolveFailure::Execution(format!(
            "failed to spawn solver thread: {}",
            e
        )));
    }

    let started = Instant::now();
    match rx.recv_timeout(budget) {
        Ok(Ok(solution)) => {
            log::debug!(
                "{} solver finished in {:.3}s with objective {:.6}",
                solver_name,
                started.elapsed().as_secs_f64(),
                solution.objective_value
            );
            Ok(solution)
        }
        Ok(Err(e)) => Err(SolveFailure::Execution(e.to_string())),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            log::warn!(
                "{} solver abandoned after {:.1}s budget",
                solver_name,
                budget.as_secs_f64()
            );
            Err(SolveFailure::Timeout { budget })
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(SolveFailure::Execution(
            "solver thread exited without producing a result".to_string(),
        )),
    }
}
