use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::QuantfolioError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Binary digits used to approximate one asset's weight fraction.
    pub precision_bits: usize,
    /// Budget-constraint penalty, scaled by the asset count at build time.
    pub penalty_multiplier: f64,
    /// Half-width of the per-asset return perturbation. Zero disables it.
    pub noise_amplitude: f64,
    pub noise_seed: u64,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            precision_bits: 4,
            penalty_multiplier: 100.0,
            noise_amplitude: 0.01,
            noise_seed: 42,
        }
    }
}

impl ConfigSection for EncodingConfig {
    fn section_name() -> &'static str {
        "encoding"
    }

    fn validate(&self) -> Result<(), QuantfolioError> {
        if self.precision_bits == 0 || self.precision_bits > 16 {
            return Err(QuantfolioError::Configuration(
                "Precision bits must be between 1 and 16".to_string(),
            ));
        }
        if self.penalty_multiplier <= 0.0 {
            return Err(QuantfolioError::Configuration(
                "Penalty multiplier must be positive".to_string(),
            ));
        }
        if self.noise_amplitude < 0.0 {
            return Err(QuantfolioError::Configuration(
                "Noise amplitude must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Encoding".to_string(),
            fields: vec![
                FieldManifest {
                    name: "precision_bits".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(4),
                    min: Some(1.0),
                    max: Some(16.0),
                    description: "Binary digits per asset weight".to_string(),
                },
                FieldManifest {
                    name: "penalty_multiplier".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(100.0),
                    min: Some(0.0),
                    max: None,
                    description: "Budget penalty weight per asset".to_string(),
                },
                FieldManifest {
                    name: "noise_amplitude".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(0.01),
                    min: Some(0.0),
                    max: Some(1.0),
                    description: "Diversification perturbation half-width".to_string(),
                },
            ],
        }
    }
}
