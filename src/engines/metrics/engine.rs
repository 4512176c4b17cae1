// src/engines/metrics/engine.rs
use crate::types::{PortfolioMetrics, ReturnsStatistics, Weights};

/// Pure portfolio scoring. Applied identically to original and
/// optimized vectors so improvement percentages stay comparable.
pub struct MetricsEngine;

impl MetricsEngine {
    pub fn calculate(weights: &Weights, stats: &ReturnsStatistics) -> PortfolioMetrics {
        let expected_return = Self::expected_return(weights, stats);
        let risk = Self::risk(weights, stats);
        let sharpe_ratio = if risk > 0.0 {
            expected_return / risk
        } else {
            0.0
        };

        PortfolioMetrics {
            expected_return,
            risk,
            sharpe_ratio,
        }
    }

    /// Dot product of weights and annualized expected returns.
    pub fn expected_return(weights: &Weights, stats: &ReturnsStatistics) -> f64 {
        weights
            .values()
            .iter()
            .zip(stats.expected_returns.iter())
            .map(|(w, r)| w * r)
            .sum()
    }

    /// sqrt(w' . Sigma . w). A tiny negative variance from float
    /// round-off is treated as zero risk rather than NaN.
    pub fn risk(weights: &Weights, stats: &ReturnsStatistics) -> f64 {
        let w = weights.values();
        let mut variance = 0.0;
        for (i, wi) in w.iter().enumerate() {
            for (j, wj) in w.iter().enumerate() {
                variance += wi * stats.covariance[i][j] * wj;
            }
        }
        variance.max(0.0).sqrt()
    }

    /// Return per unit of risk with a guarded denominator.
    pub fn optimization_score(metrics: &PortfolioMetrics, epsilon: f64) -> f64 {
        if metrics.risk > epsilon {
            metrics.expected_return / metrics.risk
        } else {
            0.0
        }
    }
}
