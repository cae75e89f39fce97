use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::app::enrich_use_case::FallbackPolicy;
use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECONDS, MAX_IDS_PER_BATCH};
use crate::error::{Result, WrappedError};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub api_base_url: String,
    pub batch_size: usize,
    pub timeout_seconds: u64,
    pub min_successful_batches: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            batch_size: MAX_IDS_PER_BATCH,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            min_successful_batches: 1,
        }
    }
}

impl EnrichmentConfig {
    pub fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy {
            min_successful_batches: self.min_successful_batches,
        }
    }
}

impl Config {
    /// Load an explicitly named config file; it must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            WrappedError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `config.toml` from the working directory, or defaults if it is absent.
    pub fn load() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        let e = &self.enrichment;
        if e.batch_size == 0 || e.batch_size > MAX_IDS_PER_BATCH {
            return Err(WrappedError::Config(format!(
                "enrichment.batch_size must be between 1 and {}, got {}",
                MAX_IDS_PER_BATCH, e.batch_size
            )));
        }
        if e.min_successful_batches == 0 {
            return Err(WrappedError::Config(
                "enrichment.min_successful_batches must be at least 1".into(),
            ));
        }
        if e.timeout_seconds == 0 {
            return Err(WrappedError::Config(
                "enrichment.timeout_seconds must be at least 1".into(),
            ));
        }
        if e.api_base_url.trim().is_empty() {
            return Err(WrappedError::Config("enrichment.api_base_url is empty".into()));
        }
        Ok(())
    }
}
