use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{DimensionWeights, EngineConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSettings {
    /// Batch worker pool size; unset means available parallelism
    pub batch_workers: Option<usize>,
    #[serde(default)]
    pub match_boost: bool,
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_academic_weight")]
    pub academic: f64,
    #[serde(default = "default_major_field_weight")]
    pub major_field: f64,
    #[serde(default = "default_demographic_weight")]
    pub demographic: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_financial_weight")]
    pub financial: f64,
    #[serde(default = "default_special_weight")]
    pub special: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            academic: default_academic_weight(),
            major_field: default_major_field_weight(),
            demographic: default_demographic_weight(),
            experience: default_experience_weight(),
            financial: default_financial_weight(),
            special: default_special_weight(),
        }
    }
}

fn default_academic_weight() -> f64 { DimensionWeights::DEFAULT.academic }
fn default_major_field_weight() -> f64 { DimensionWeights::DEFAULT.major_field }
fn default_demographic_weight() -> f64 { DimensionWeights::DEFAULT.demographic }
fn default_experience_weight() -> f64 { DimensionWeights::DEFAULT.experience }
fn default_financial_weight() -> f64 { DimensionWeights::DEFAULT.financial }
fn default_special_weight() -> f64 { DimensionWeights::DEFAULT.special }

impl From<&WeightsConfig> for DimensionWeights {
    fn from(weights: &WeightsConfig) -> Self {
        DimensionWeights {
            academic: weights.academic,
            major_field: weights.major_field,
            demographic: weights.demographic,
            experience: weights.experience,
            financial: weights.financial,
            special: weights.special,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCHOLARMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCHOLARMATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Settings>()?.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Settings>()?.validated()
    }

    /// Reject weight tables that are negative or do not sum to 1.0
    pub fn validated(self) -> Result<Self, ConfigError> {
        DimensionWeights::from(&self.engine.weights)
            .validate()
            .map_err(|e| ConfigError::Message(format!("engine.weights: {e}")))?;
        Ok(self)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            weights: DimensionWeights::from(&self.engine.weights),
            batch_workers: self.engine.batch_workers,
            match_boost: self.engine.match_boost,
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SCHOLARMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
