use std::sync::Arc;
use std::time::Duration;

use polars::prelude::DataFrame;

use crate::config::AppConfig;
use crate::data::DataValidator;
use crate::engines::decoding::SolutionDecoder;
use crate::engines::encoding::QuboEncoder;
use crate::engines::metrics::MetricsEngine;
use crate::engines::proxy::ProxyWeightGenerator;
use crate::engines::returns::ReturnsModel;
use crate::engines::solver::{build_solver, solve_with_deadline, QuboSolver};
use crate::error::{QuantfolioError, Result};
use crate::types::{
    AllocationReport, ImprovementReport, OptimizationMethod, OptimizationOutcome,
    PortfolioMetrics, ReturnsStatistics, SelectedAllocation, SolverDiagnostics, SolverStatus,
    Weights,
};

/// One optimization request. The universe is immutable once the
/// pipeline starts; index order is significant throughout.
#[derive(Debug, Clone)]
pub struct OptimizeRequest {
    pub tickers: Vec<String>,
    pub prices: DataFrame,
    /// 0 = maximum risk aversion, 1 = pure return-seeking.
    pub risk_factor: f64,
    pub initial_weights: Option<Vec<f64>>,
}

/// What the solve attempt contributed, decided before metrics run.
///
/// `Start -> DataLoaded -> (SolveAttempted | SolveSkipped) ->
/// OutcomeSelected -> MetricsComputed -> Done`; this enum is the
/// OutcomeSelected step.
enum SolveDisposition {
    /// Decoded weights differ meaningfully from the original.
    Accepted {
        weights: Weights,
        diagnostics: SolverDiagnostics,
    },
    /// Solver succeeded but reproduced the original allocation.
    Collapsed { diagnostics: SolverDiagnostics },
    /// Timeout or execution failure; no solution exists.
    Unavailable { diagnostics: SolverDiagnostics },
}

/// Orchestrates the full pipeline and reconciles the caller's original
/// allocation against the optimized one. Solver-stage errors never
/// escape this engine; only input validation and data loading fail.
pub struct ReconciliationEngine {
    config: AppConfig,
    solver: Arc<dyn QuboSolver>,
}

impl ReconciliationEngine {
    pub fn new(config: AppConfig) -> Self {
        let solver = build_solver(&config.solver);
        Self { config, solver }
    }

    /// Inject a specific solver; used by callers that pre-build one and
    /// by tests that need scripted solver behavior.
    pub fn with_solver(config: AppConfig, solver: Arc<dyn QuboSolver>) -> Self {
        Self { config, solver }
    }

    /// Full pipeline from a price table.
    pub fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizationOutcome> {
        self.validate_request(request)?;
        DataValidator::validate_tickers(&request.prices, &request.tickers)?;

        let model = ReturnsModel::new(&self.config.data);
        let stats = model.estimate(&request.prices, &request.tickers)?;

        let initial = request
            .initial_weights
            .as_ref()
            .map(|w| Weights::from_raw(w.clone()));

        self.reconcile(&request.tickers, &stats, initial.as_ref(), request.risk_factor)
    }

    /// Pipeline from precomputed statistics. Public so callers with
    /// their own return estimates can skip the price table.
    pub fn reconcile(
        &self,
        tickers: &[String],
        stats: &ReturnsStatistics,
        initial: Option<&Weights>,
        risk_factor: f64,
    ) -> Result<OptimizationOutcome> {
        Self::validate_universe(tickers, initial.map(|w| w.values()), risk_factor)?;
        stats.validate()?;
        if stats.num_assets() != tickers.len() {
            return Err(QuantfolioError::InvalidInput(format!(
                "Statistics cover {} assets but {} tickers were given",
                stats.num_assets(),
                tickers.len()
            )));
        }

        let original = match initial {
            Some(w) => w.clone(),
            None => Weights::uniform(tickers.len()),
        };
        let original_metrics = MetricsEngine::calculate(&original, stats);
        if original_metrics.risk == 0.0 {
            log::warn!("Original allocation has zero risk; Sharpe ratio degenerates to 0");
        }

        let disposition = self.attempt_solve(stats, &original, risk_factor);

        let (optimized, method, verified, diagnostics) = match disposition {
            SolveDisposition::Accepted {
                weights,
                diagnostics,
            } => (weights, OptimizationMethod::Qubo, true, diagnostics),
            SolveDisposition::Collapsed { diagnostics } => {
                log::info!(
                    "Solver collapsed onto the original allocation; substituting proxy weights"
                );
                let weights = ProxyWeightGenerator::generate(
                    Some(stats),
                    Some(&original),
                    1.0 - risk_factor,
                    tickers.len(),
                );
                (
                    weights,
                    OptimizationMethod::SyntheticEnhancement,
                    false,
                    diagnostics,
                )
            }
            SolveDisposition::Unavailable { diagnostics } => {
                log::info!(
                    "Solver unavailable ({:?}); substituting proxy weights",
                    diagnostics.status
                );
                let weights = ProxyWeightGenerator::generate(
                    Some(stats),
                    Some(&original),
                    1.0 - risk_factor,
                    tickers.len(),
                );
                (
                    weights,
                    OptimizationMethod::SyntheticEnhancement,
                    false,
                    diagnostics,
                )
            }
        };

        let optimized_metrics = MetricsEngine::calculate(&optimized, stats);
        let improvements = self.improvements(&original_metrics, &optimized_metrics);
        let selected = self.select(tickers, &optimized);

        Ok(OptimizationOutcome {
            original: self.report(tickers, &original, &original_metrics),
            optimized: self.report(tickers, &optimized, &optimized_metrics),
            selected,
            improvements,
            method,
            verified,
            solver: diagnostics,
        })
    }

    fn attempt_solve(
        &self,
        stats: &ReturnsStatistics,
        original: &Weights,
        risk_factor: f64,
    ) -> SolveDisposition {
        let encoder = QuboEncoder::new(&self.config.encoding);
        let problem = match encoder.build(stats, risk_factor) {
            Ok(problem) => problem,
            Err(e) => {
                return SolveDisposition::Unavailable {
                    diagnostics: self.failure_diagnostics(SolverStatus::Failed, e.to_string()),
                }
            }
        };

        let budget = Duration::from_secs(self.config.solver.timeout_secs);
        match solve_with_deadline(Arc::clone(&self.solver), problem, budget) {
            Ok(solution) => {
                let decoder = SolutionDecoder::new(self.config.encoding.precision_bits);
                let weights = decoder
                    .decode(&solution.assignment, stats.num_assets())
                    .sanitized();

                if weights.l1_distance(original) < self.config.reconcile.collapse_threshold {
                    SolveDisposition::Collapsed {
                        diagnostics: SolverDiagnostics {
                            solver: self.solver.name().to_string(),
                            status: SolverStatus::Collapsed,
                            objective_value: solution.objective_value,
                            confidence: 0.0,
                            detail: Some(
                                "decoded weights within collapse threshold of original allocation"
                                    .to_string(),
                            ),
                        },
                    }
                } else {
                    SolveDisposition::Accepted {
                        weights,
                        diagnostics: SolverDiagnostics {
                            solver: self.solver.name().to_string(),
                            status: SolverStatus::Solved,
                            objective_value: solution.objective_value,
                            confidence: 1.0 / (1.0 + solution.objective_value.abs()),
                            detail: None,
                        },
                    }
                }
            }
            Err(failure) => SolveDisposition::Unavailable {
                diagnostics: self.failure_diagnostics(failure.status(), failure.to_string()),
            },
        }
    }

    fn failure_diagnostics(&self, status: SolverStatus, detail: String) -> SolverDiagnostics {
        SolverDiagnostics {
            solver: self.solver.name().to_string(),
            status,
            objective_value: 0.0,
            confidence: 0.0,
            detail: Some(detail),
        }
    }

    fn improvements(
        &self,
        original: &PortfolioMetrics,
        optimized: &PortfolioMetrics,
    ) -> ImprovementReport {
        let epsilon = self.config.reconcile.epsilon;
        let clamp = self.config.reconcile.improvement_clamp_pct;

        let original_score = MetricsEngine::optimization_score(original, epsilon);
        let optimized_score = MetricsEngine::optimization_score(optimized, epsilon);

        ImprovementReport {
            return_improvement: Self::improvement_pct(
                original.expected_return,
                optimized.expected_return,
                epsilon,
                clamp,
            ),
            risk_change: Self::improvement_pct(original.risk, optimized.risk, epsilon, clamp),
            sharpe_improvement: Self::improvement_pct(
                original.sharpe_ratio,
                optimized.sharpe_ratio,
                epsilon,
                clamp,
            ),
            score_improvement: Self::improvement_pct(
                original_score,
                optimized_score,
                epsilon,
                clamp,
            ),
        }
    }

    /// Percentage change guarded against a near-zero denominator and
    /// clamped symmetrically.
    fn improvement_pct(original: f64, optimized: f64, epsilon: f64, clamp: f64) -> f64 {
        if original.abs() > epsilon {
            ((optimized - original) / original.abs() * 100.0).clamp(-clamp, clamp)
        } else {
            0.0
        }
    }

    /// Tickers whose optimized weight clears the reporting threshold.
    /// An empty selection degenerates to the full universe so consumers
    /// always receive at least one asset.
    fn select(&self, tickers: &[String], weights: &Weights) -> SelectedAllocation {
        let threshold = self.config.reconcile.weight_threshold;
        let mut selected_tickers = Vec::new();
        let mut selected_weights = Vec::new();

        for (ticker, &weight) in tickers.iter().zip(weights.values()) {
            if weight > threshold {
                selected_tickers.push(ticker.clone());
                selected_weights.push(weight);
            }
        }

        if selected_tickers.is_empty() {
            selected_tickers = tickers.to_vec();
            selected_weights = weights.values().to_vec();
        }

        SelectedAllocation {
            tickers: selected_tickers,
            weights: selected_weights,
        }
    }

    fn report(
        &self,
        tickers: &[String],
        weights: &Weights,
        metrics: &PortfolioMetrics,
    ) -> AllocationReport {
        AllocationReport {
            tickers: tickers.to_vec(),
            weights: weights.values().to_vec(),
            expected_return: metrics.expected_return,
            risk: metrics.risk,
            sharpe_ratio: metrics.sharpe_ratio,
            optimization_score: MetricsEngine::optimization_score(
                metrics,
                self.config.reconcile.epsilon,
            ),
        }
    }

    fn validate_request(&self, request: &OptimizeRequest) -> Result<()> {
        Self::validate_universe(
            &request.tickers,
            request.initial_weights.as_deref(),
            request.risk_factor,
        )
    }

    fn validate_universe(
        tickers: &[String],
        initial_weights: Option<&[f64]>,
        risk_factor: f64,
    ) -> Result<()> {
        if tickers.is_empty() {
            return Err(QuantfolioError::InvalidInput(
                "At least one ticker is required".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&risk_factor) {
            return Err(QuantfolioError::InvalidInput(format!(
                "Risk factor must be within [0, 1], got {}",
                risk_factor
            )));
        }

        if let Some(weights) = initial_weights {
            if weights.len() != tickers.len() {
                return Err(QuantfolioError::InvalidInput(format!(
                    "{} initial weights given for {} tickers",
                    weights.len(),
                    tickers.len()
                )));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(QuantfolioError::InvalidInput(
                    "Initial weights must be finite and non-negative".to_string(),
                ));
            }
            let sum: f64 = weights.iter().sum();
            if !(0.99..=1.01).contains(&sum) {
                return Err(QuantfolioError::InvalidInput(format!(
                    "Initial weights must sum to 1.0 within 1%, got {}",
                    sum
                )));
            }
        }

        Ok(())
    }
}
