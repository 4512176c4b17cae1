use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::QuantfolioError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Trading periods per year used to annualize returns and covariance.
    pub periods_per_year: usize,
    /// Minimum usable return observations per estimation.
    pub min_observations: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            periods_per_year: 252,
            min_observations: 2,
        }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), QuantfolioError> {
        if self.periods_per_year == 0 {
            return Err(QuantfolioError::Configuration(
                "Periods per year must be at least 1".to_string(),
            ));
        }
        if self.min_observations < 2 {
            return Err(QuantfolioError::Configuration(
                "Minimum observations must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Data".to_string(),
            fields: vec![
                FieldManifest {
                    name: "periods_per_year".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(252),
                    min: Some(1.0),
                    max: Some(366.0),
                    description: "Annualization factor for return statistics".to_string(),
                },
                FieldManifest {
                    name: "min_observations".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(2),
                    min: Some(2.0),
                    max: None,
                    description: "Minimum usable return rows".to_string(),
                },
            ],
        }
    }
}
