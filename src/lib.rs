pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use engines::reconcile::{OptimizeRequest, ReconciliationEngine};
pub use error::{QuantfolioError, Result};
pub use types::OptimizationOutcome;

/// One-shot entry point: build an engine from the given configuration
/// and run a single optimization. The crate keeps no state between
/// calls.
pub fn optimize(request: &OptimizeRequest, config: AppConfig) -> Result<OptimizationOutcome> {
    ReconciliationEngine::new(config).optimize(request)
}
