use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::QuantfolioError;
use serde::{Deserialize, Serialize};

/// Concrete solver implementation, chosen once at engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverStrategy {
    /// Exhaustive enumeration; reference strategy for small problems.
    Exact,
    /// Seeded multi-restart bit-flip descent; the production default.
    Sampling,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub strategy: SolverStrategy,
    /// Hard wall-clock budget for one solve attempt.
    pub timeout_secs: u64,
    /// Descent sweeps per restart.
    pub max_iterations: usize,
    pub restarts: usize,
    /// Fixed seed for reproducible solves; absent means entropy-seeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Variable count above which the exact solver refuses to enumerate.
    pub max_exact_variables: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: SolverStrategy::Sampling,
            timeout_secs: 20,
            max_iterations: 30,
            restarts: 8,
            seed: None,
            max_exact_variables: 24,
        }
    }
}

impl ConfigSection for SolverConfig {
    fn section_name() -> &'static str {
        "solver"
    }

    fn validate(&self) -> Result<(), QuantfolioError> {
        if self.max_iterations == 0 {
            return Err(QuantfolioError::Configuration(
                "Solver iterations must be at least 1".to_string(),
            ));
        }
        if self.restarts == 0 {
            return Err(QuantfolioError::Configuration(
                "Solver restarts must be at least 1".to_string(),
            ));
        }
        if self.max_exact_variables == 0 || self.max_exact_variables > 30 {
            return Err(QuantfolioError::Configuration(
                "Exact variable cap must be between 1 and 30".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Solver".to_string(),
            fields: vec![
                FieldManifest {
                    name: "timeout_secs".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(20),
                    min: Some(0.0),
                    max: None,
                    description: "Wall-clock budget per solve attempt".to_string(),
                },
                FieldManifest {
                    name: "max_iterations".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(30),
                    min: Some(1.0),
                    max: Some(10000.0),
                    description: "Descent sweeps per restart".to_string(),
                },
                FieldManifest {
                    name: "restarts".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(8),
                    min: Some(1.0),
                    max: Some(1024.0),
                    description: "Independent descent restarts".to_string(),
                },
            ],
        }
    }
}
