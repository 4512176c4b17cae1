use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::QuantfolioError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// L1 distance below which a solver result counts as a collapse back
    /// onto the caller's original allocation.
    pub collapse_threshold: f64,
    /// Weights at or below this are dropped from the selected set.
    pub weight_threshold: f64,
    /// Symmetric clamp for reported improvement percentages.
    pub improvement_clamp_pct: f64,
    /// Denominator guard for improvement ratios.
    pub epsilon: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            collapse_threshold: 1e-3,
            weight_threshold: 1e-6,
            improvement_clamp_pct: 1000.0,
            epsilon: 1e-6,
        }
    }
}

impl ConfigSection for ReconcileConfig {
    fn section_name() -> &'static str {
        "reconcile"
    }

    fn validate(&self) -> Result<(), QuantfolioError> {
        if self.collapse_threshold < 0.0 {
            return Err(QuantfolioError::Configuration(
                "Collapse threshold must not be negative".to_string(),
            ));
        }
        if self.weight_threshold < 0.0 {
            return Err(QuantfolioError::Configuration(
                "Weight threshold must not be negative".to_string(),
            ));
        }
        if self.improvement_clamp_pct <= 0.0 {
            return Err(QuantfolioError::Configuration(
                "Improvement clamp must be positive".to_string(),
            ));
        }
        if self.epsilon <= 0.0 {
            return Err(QuantfolioError::Configuration(
                "Epsilon must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Reconcile".to_string(),
            fields: vec![
                FieldManifest {
                    name: "collapse_threshold".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(1e-3),
                    min: Some(0.0),
                    max: Some(1.0),
                    description: "L1 distance treated as a no-op solve".to_string(),
                },
                FieldManifest {
                    name: "weight_threshold".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(1e-6),
                    min: Some(0.0),
                    max: Some(1.0),
                    description: "Reporting cutoff for selected tickers".to_string(),
                },
                FieldManifest {
                    name: "improvement_clamp_pct".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(1000.0),
                    min: Some(0.0),
                    max: None,
                    description: "Bound on reported improvement percentages".to_string(),
                },
            ],
        }
    }
}
