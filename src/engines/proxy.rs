use crate::types::{ReturnsStatistics, Weights};

const MOMENTUM_SHIFT: f64 = 1e-6;
const VARIANCE_FLOOR: f64 = 1e-8;

/// Deterministic fallback allocation for when the solver path is
/// unavailable, times out, fails, or collapses onto the caller's
/// original weights.
///
/// Blends return momentum with inverse volatility, then mixes the blend
/// with the caller's initial allocation. This is a heuristic, not an
/// optimization; outcomes built from it must be flagged unverified.
pub struct ProxyWeightGenerator;

impl ProxyWeightGenerator {
    /// `risk_aversion` is 1 - riskFactor: 1 means maximum caution
    /// (lean on inverse volatility and the initial allocation), 0 means
    /// chase returns.
    pub fn generate(
        stats: Option<&ReturnsStatistics>,
        initial: Option<&Weights>,
        risk_aversion: f64,
        num_assets: usize,
    ) -> Weights {
        let stats = match stats {
            Some(s) if !s.expected_returns.is_empty() => s,
            _ => {
                // No statistics to blend from; echo the initial
                // allocation or fall back to uniform.
                if let Some(initial) = initial {
                    return initial.clone();
                }
                return Weights::uniform(num_assets);
            }
        };
        let returns = &stats.expected_returns;
        let n = returns.len();

        let risk_aversion = risk_aversion.clamp(0.0, 1.0);

        // Shift returns non-negative before treating them as
        // probability-like weights; negative momentum must not produce
        // negative allocations.
        let min_return = returns.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let momentum = Weights::from_raw(
            returns
                .iter()
                .map(|r| r - min_return + MOMENTUM_SHIFT)
                .collect(),
        )
        .normalized();

        let inv_vol = Weights::from_raw(
            (0..n)
                .map(|i| 1.0 / stats.variance(i).max(VARIANCE_FLOOR).sqrt())
                .collect(),
        )
        .normalized();

        let blend_returns = 0.55 + (1.0 - risk_aversion) * 0.3;
        let blend_risk = 1.0 - blend_returns;
        let blended = Weights::from_raw(
            momentum
                .values()
                .iter()
                .zip(inv_vol.values())
                .map(|(m, v)| blend_returns * m + blend_risk * v)
                .collect(),
        )
        .sanitized();

        let initial = match initial {
            Some(w) if w.sum() > 0.0 => w.clone(),
            _ => Weights::uniform(n),
        };

        let mixing = 0.35 + (1.0 - risk_aversion) * 0.15;
        Weights::from_raw(
            blended
                .values()
                .iter()
                .zip(initial.values())
                .map(|(b, i)| mixing * b + (1.0 - mixing) * i)
                .collect(),
        )
        .sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> ReturnsStatistics {
        ReturnsStatistics {
            expected_returns: vec![0.20, 0.05],
            covariance: vec![vec![0.01, 0.00], vec![0.00, 0.25]],
        }
    }

    #[test]
    fn test_valid_weights_for_plain_inputs() {
        let weights = ProxyWeightGenerator::generate(Some(&stats()), None, 0.5, 2);
        assert_eq!(weights.len(), 2);
        assert!((weights.sum() - 1.0).abs() < 1e-9);
        assert!(weights.values().iter().all(|&w| w >= 0.0));
    }

    #[test]
    fn test_empty_statistics_echo_initial() {
        let initial = Weights::from_raw(vec![0.3, 0.7]);
        let weights = ProxyWeightGenerator::generate(None, Some(&initial), 0.5, 2);
        assert_eq!(weights, initial);
    }

    #[test]
    fn test_empty_statistics_without_initial_are_uniform() {
        let weights = ProxyWeightGenerator::generate(None, None, 0.5, 3);
        assert_eq!(weights.values(), &[1.0 / 3.0; 3]);
    }

    #[test]
    fn test_empty_universe_yields_empty_vector() {
        let weights = ProxyWeightGenerator::generate(None, None, 0.5, 0);
        assert!(weights.is_empty());
    }

    #[test]
    fn test_negative_returns_stay_non_negative() {
        let stats = ReturnsStatistics {
            expected_returns: vec![-0.30, -0.10],
            covariance: vec![vec![0.04, 0.00], vec![0.00, 0.09]],
        };
        let weights = ProxyWeightGenerator::generate(Some(&stats), None, 0.2, 2);
        assert!(weights.values().iter().all(|&w| w >= 0.0));
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_caution_tilts_toward_low_volatility() {
        // Asset 0 carries both the higher return and the lower
        // volatility, so full risk aversion must not allocate more to
        // asset 1 than uniform does.
        let uniform = Weights::uniform(2);
        let weights =
            ProxyWeightGenerator::generate(Some(&stats()), Some(&uniform), 1.0, 2);
        assert!(weights.values()[0] > weights.values()[1]);
    }
}
