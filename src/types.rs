use serde::{Deserialize, Serialize};

use crate::error::{QuantfolioError, Result};

/// Allocation across an ordered asset universe.
///
/// Transformations never mutate in place; every operation returns a new
/// vector so intermediate allocations stay comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(Vec<f64>);

impl Weights {
    pub fn from_raw(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Equal allocation `1/n` for every asset.
    pub fn uniform(n: usize) -> Self {
        if n == 0 {
            return Self(Vec::new());
        }
        Self(vec![1.0 / n as f64; n])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Negative entries clipped to zero.
    pub fn clipped_non_negative(&self) -> Self {
        Self(self.0.iter().map(|w| w.max(0.0)).collect())
    }

    /// Rescaled to sum 1. A zero-sum vector degenerates to uniform.
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        if total > 0.0 {
            Self(self.0.iter().map(|w| w / total).collect())
        } else {
            Self::uniform(self.0.len())
        }
    }

    /// Clip floating-point residues below zero, then renormalize.
    pub fn sanitized(&self) -> Self {
        self.clipped_non_negative().normalized()
    }

    pub fn l1_distance(&self, other: &Self) -> f64 {
        debug_assert_eq!(self.len(), other.len());
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).abs())
            .sum()
    }
}

/// Annualized return statistics estimated from a price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsStatistics {
    pub expected_returns: Vec<f64>,
    pub covariance: Vec<Vec<f64>>,
}

impl ReturnsStatistics {
    pub fn num_assets(&self) -> usize {
        self.expected_returns.len()
    }

    pub fn variance(&self, asset: usize) -> f64 {
        self.covariance[asset][asset]
    }

    /// Shape and symmetry checks. An asymmetric covariance matrix is a
    /// data-integrity error, never silently corrected.
    pub fn validate(&self) -> Result<()> {
        let n = self.expected_returns.len();
        if self.covariance.len() != n {
            return Err(QuantfolioError::Computation(format!(
                "covariance has {} rows, expected {}",
                self.covariance.len(),
                n
            )));
        }
        for (i, row) in self.covariance.iter().enumerate() {
            if row.len() != n {
                return Err(QuantfolioError::Computation(format!(
                    "covariance row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if self.covariance[i][j] != self.covariance[j][i] {
                    return Err(QuantfolioError::Computation(format!(
                        "covariance is not symmetric at ({}, {}): {} != {}",
                        i, j, self.covariance[i][j], self.covariance[j][i]
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Point-in-time quality of one allocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub expected_return: f64,
    pub risk: f64,
    pub sharpe_ratio: f64,
}

/// One side of the original-vs-optimized comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationReport {
    pub tickers: Vec<String>,
    pub weights: Vec<f64>,
    pub expected_return: f64,
    pub risk: f64,
    pub sharpe_ratio: f64,
    pub optimization_score: f64,
}

/// Tickers whose optimized weight clears the reporting threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedAllocation {
    pub tickers: Vec<String>,
    pub weights: Vec<f64>,
}

/// Percentage deltas between original and optimized metrics, clamped
/// against division-by-near-zero blow-ups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImprovementReport {
    pub return_improvement: f64,
    pub risk_change: f64,
    pub sharpe_improvement: f64,
    pub score_improvement: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverStatus {
    Solved,
    TimedOut,
    Failed,
    /// Solver returned, but the decoded weights were indistinguishable
    /// from the caller's original allocation.
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizationMethod {
    Qubo,
    SyntheticEnhancement,
}

/// Solver-stage evidence carried on every outcome, including fallback
/// outcomes where no solver solution was used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverDiagnostics {
    pub solver: String,
    pub status: SolverStatus,
    pub objective_value: f64,
    pub confidence: f64,
    pub detail: Option<String>,
}

/// The externally consumed artifact. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    pub original: AllocationReport,
    pub optimized: AllocationReport,
    pub selected: SelectedAllocation,
    pub improvements: ImprovementReport,
    pub method: OptimizationMethod,
    pub verified: bool,
    pub solver: SolverDiagnostics,
}
