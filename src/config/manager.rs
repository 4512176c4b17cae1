use super::{
    data::DataConfig,
    encoding::EncodingConfig,
    reconcile::ReconcileConfig,
    solver::SolverConfig,
    traits::{ConfigManifest, ConfigSection},
};
use crate::error::QuantfolioError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub encoding: EncodingConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), QuantfolioError> {
        self.encoding.validate()?;
        self.solver.validate()?;
        self.data.validate()?;
        self.reconcile.validate()?;
        Ok(())
    }

    pub fn manifest(&self) -> Vec<ConfigManifest> {
        vec![
            self.encoding.to_manifest(),
            self.solver.to_manifest(),
            self.data.to_manifest(),
            self.reconcile.to_manifest(),
        ]
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML file layered with `QUANTFOLIO__SECTION__FIELD`
    /// environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), QuantfolioError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("QUANTFOLIO").separator("__"))
            .build()
            .map_err(|e| QuantfolioError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| QuantfolioError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.config.write().unwrap() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), QuantfolioError> {
        let config = self.config.read().unwrap();
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| QuantfolioError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| QuantfolioError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap().clone()
    }

    pub fn update<F>(&self, f: F) -> Result<(), QuantfolioError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap();
        f(&mut config);
        config.validate()?;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
