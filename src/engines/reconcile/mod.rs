pub mod engine;

pub use engine::{OptimizeRequest, ReconciliationEngine};
