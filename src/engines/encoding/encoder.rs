use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EncodingConfig;
use crate::error::{QuantfolioError, Result};
use crate::types::ReturnsStatistics;

use super::qubo::{bit_weight, QuboProblem, VarId};

/// Maps continuous asset weights onto N x B binary variables with a
/// soft budget-equality penalty.
///
/// `return_appetite` is the lambda of the objective: 0 weighs risk
/// only, 1 weighs return only.
pub struct QuboEncoder {
    precision_bits: usize,
    penalty_multiplier: f64,
    noise_amplitude: f64,
    noise_seed: u64,
}

impl QuboEncoder {
    pub fn new(config: &EncodingConfig) -> Self {
        Self {
            precision_bits: config.precision_bits,
            penalty_multiplier: config.penalty_multiplier,
            noise_amplitude: config.noise_amplitude,
            noise_seed: config.noise_seed,
        }
    }

    pub fn build(&self, stats: &ReturnsStatistics, return_appetite: f64) -> Result<QuboProblem> {
        if !(0.0..=1.0).contains(&return_appetite) {
            return Err(QuantfolioError::InvalidInput(format!(
                "Return appetite must be within [0, 1], got {}",
                return_appetite
            )));
        }
        stats.validate()?;

        let n = stats.num_assets();
        let bits = self.precision_bits;
        let lambda = return_appetite;
        let noise = self.draw_noise(n);

        let mut problem = QuboProblem::new(n, bits);

        // Return term, perturbed per asset to discourage collapse onto
        // the single best performer.
        for i in 0..n {
            let adjusted_return = stats.expected_returns[i] + noise[i];
            for bit in 0..bits {
                let var = VarId { asset: i, bit };
                problem.add_linear(var, -lambda * adjusted_return * bit_weight(bit, bits));
            }
        }

        // Risk term over every ordered bit pair; accumulation into
        // canonical keys reproduces w'.Sigma.w over binary variables.
        for i in 0..n {
            for j in 0..n {
                let cov = stats.covariance[i][j];
                for bit_i in 0..bits {
                    for bit_j in 0..bits {
                        let coeff = (1.0 - lambda)
                            * cov
                            * bit_weight(bit_i, bits)
                            * bit_weight(bit_j, bits);
                        problem.add_quadratic(
                            VarId { asset: i, bit: bit_i },
                            VarId { asset: j, bit: bit_j },
                            coeff,
                        );
                    }
                }
            }
        }

        // Soft budget constraint (sum of weights == 1). Cross-terms are
        // added only between bits of different assets.
        let penalty = self.penalty_multiplier * n as f64;
        for i in 0..n {
            for bit_i in 0..bits {
                let var_i = VarId { asset: i, bit: bit_i };
                let w_i = bit_weight(bit_i, bits);

                problem.add_quadratic(var_i, var_i, penalty * w_i * w_i);
                problem.add_linear(var_i, -2.0 * penalty * w_i);

                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    for bit_j in 0..bits {
                        let var_j = VarId { asset: j, bit: bit_j };
                        let w_j = bit_weight(bit_j, bits);
                        problem.add_quadratic(var_i, var_j, 2.0 * penalty * w_i * w_j);
                    }
                }
            }
        }

        log::debug!(
            "QUBO built: {} variables, {} linear terms, {} quadratic terms",
            problem.num_variables(),
            problem.linear().len(),
            problem.quadratic().len()
        );

        Ok(problem)
    }

    /// Seeded uniform perturbation in [-amplitude, amplitude), one draw
    /// per asset. Amplitude zero skips the generator entirely so the
    /// encoding stays exact.
    fn draw_noise(&self, n: usize) -> Vec<f64> {
        if self.noise_amplitude == 0.0 {
            return vec![0.0; n];
        }

        let mut rng = StdRng::seed_from_u64(self.noise_seed);
        (0..n)
            .map(|_| rng.gen_range(-self.noise_amplitude..self.noise_amplitude))
            .collect()
    }
}
