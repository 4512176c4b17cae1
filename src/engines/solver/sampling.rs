use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::engines::encoding::QuboProblem;
use crate::error::{QuantfolioError, Result};

use super::{QuboSolver, SolverSolution};

/// Bounded-iteration local optimizer: independent seeded restarts, each
/// running greedy single-bit-flip descent, evaluated in parallel.
/// Deterministic for a fixed seed regardless of thread scheduling.
pub struct SamplingSolver {
    max_iterations: usize,
    restarts: usize,
    seed: Option<u64>,
}

/// Flattened coefficient view for O(degree) flip deltas.
struct DenseQubo {
    num_variables: usize,
    linear: Vec<f64>,
    /// Coefficient of the (v, v) self pair; acts linearly since x^2 == x.
    self_quadratic: Vec<f64>,
    /// For each variable, its incident cross pairs as (other, coeff).
    neighbors: Vec<Vec<(usize, f64)>>,
}

impl DenseQubo {
    fn from_problem(problem: &QuboProblem) -> Self {
        let n = problem.num_variables();
        let bits = problem.precision_bits();

        let mut linear = vec![0.0; n];
        for (var, coeff) in problem.linear() {
            linear[var.index(bits)] += coeff;
        }

        let mut self_quadratic = vec![0.0; n];
        let mut neighbors = vec![Vec::new(); n];
        for ((a, b), coeff) in problem.quadratic() {
            let ia = a.index(bits);
            let ib = b.index(bits);
            if ia == ib {
                self_quadratic[ia] += coeff;
            } else {
                neighbors[ia].push((ib, *coeff));
                neighbors[ib].push((ia, *coeff));
            }
        }

        Self {
            num_variables: n,
            linear,
            self_quadratic,
            neighbors,
        }
    }

    fn evaluate(&self, assignment: &[bool]) -> f64 {
        let mut value = 0.0;
        for v in 0..self.num_variables {
            if !assignment[v] {
                continue;
            }
            value += self.linear[v] + self.self_quadratic[v];
            for &(other, coeff) in &self.neighbors[v] {
                // Each cross pair is stored on both endpoints; count it
                // once by the lower index.
                if other > v && assignment[other] {
                    value += coeff;
                }
            }
        }
        value
    }

    /// Objective change from flipping variable `v`.
    fn flip_delta(&self, assignment: &[bool], v: usize) -> f64 {
        let mut local = self.linear[v] + self.self_quadratic[v];
        for &(other, coeff) in &self.neighbors[v] {
            if assignment[other] {
                local += coeff;
            }
        }
        if assignment[v] {
            -local
        } else {
            local
        }
    }
}

impl SamplingSolver {
    pub fn new(max_iterations: usize, restarts: usize, seed: Option<u64>) -> Self {
        Self {
            max_iterations,
            restarts,
            seed,
        }
    }

    fn descend(&self, dense: &DenseQubo, seed: u64) -> (Vec<bool>, f64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut assignment: Vec<bool> = (0..dense.num_variables).map(|_| rng.gen()).collect();
        let mut value = dense.evaluate(&assignment);

        for _ in 0..self.max_iterations {
            let mut improved = false;
            for v in 0..dense.num_variables {
                let delta = dense.flip_delta(&assignment, v);
                if delta < 0.0 {
                    assignment[v] = !assignment[v];
                    value += delta;
                    improved = true;
                }
            }
            if !improved {
                break;
            }
        }

        (assignment, value)
    }
}

impl QuboSolver for SamplingSolver {
    fn name(&self) -> &'static str {
        "sampling"
    }

    fn solve(&self, problem: &QuboProblem) -> Result<SolverSolution> {
        let n = problem.num_variables();
        if n == 0 {
            return Err(QuantfolioError::SolverExecution(
                "Problem has no variables".to_string(),
            ));
        }

        let dense = DenseQubo::from_problem(problem);
        let base_seed = self
            .seed
            .unwrap_or_else(|| StdRng::from_entropy().gen());

        let best = (0..self.restarts)
            .into_par_iter()
            .map(|restart| self.descend(&dense, base_seed.wrapping_add(restart as u64)))
            .min_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            })
            .expect("at least one restart is enforced by config validation");

        log::debug!(
            "Sampling solve: {} restarts x {} sweeps, best objective {:.6}",
            self.restarts,
            self.max_iterations,
            best.1
        );

        Ok(SolverSolution {
            assignment: best.0,
            objective_value: best.1,
        })
    }
}
