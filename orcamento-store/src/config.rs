//! Configuration management.

use orcamento_core::DAILY_QUOTA_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, default_data_dir, load_json, save_json};

/// Storage key of the entitlement record.
pub const QUOTA_KEY: &str = "orcamento_quota";

/// Storage key of the quote collection.
pub const QUOTES_KEY: &str = "orcamentos";

/// What to do when a stored record does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CorruptRecordPolicy {
    /// Return [`StoreError::CorruptRecord`] to the caller.
    #[default]
    Propagate,
    /// Log a warning and treat the record as absent.
    FailOpen,
}

impl std::str::FromStr for CorruptRecordPolicy {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "propagate" => Ok(Self::Propagate),
            "fail_open" => Ok(Self::FailOpen),
            other => Err(StoreError::Config(format!(
                "unknown corrupt-record policy '{other}' (expected propagate or fail-open)"
            ))),
        }
    }
}

impl std::fmt::Display for CorruptRecordPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorruptRecordPolicy::Propagate => write!(f, "propagate"),
            CorruptRecordPolicy::FailOpen => write!(f, "fail-open"),
        }
    }
}

/// Settings of an [`EntitlementStore`](crate::EntitlementStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementConfig {
    /// Key the record lives under.
    pub storage_key: String,
    /// Free-tier creations per day.
    pub daily_limit: u32,
    /// Handling of unparsable records.
    pub corrupt_records: CorruptRecordPolicy,
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            storage_key: QUOTA_KEY.to_string(),
            daily_limit: DAILY_QUOTA_LIMIT,
            corrupt_records: CorruptRecordPolicy::default(),
        }
    }
}

/// Issuer details printed on the document banner and signature line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    /// Legal name.
    pub name: String,
    /// Tax registration (CNPJ).
    pub tax_id: String,
    /// Postal address.
    pub address: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "Minha Empresa LTDA".to_string(),
            tax_id: "00.000.000/0001-00".to_string(),
            address: "Endereço da Empresa".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the key-value files. `None` = platform default.
    pub data_dir: Option<PathBuf>,
    /// Free-tier creations per day.
    pub daily_limit: u32,
    /// Handling of unparsable records.
    pub corrupt_records: CorruptRecordPolicy,
    /// Log level used when `--verbose` is not given.
    pub log_level: String,
    /// Issuer shown on rendered quotes.
    pub company: CompanyProfile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            daily_limit: DAILY_QUOTA_LIMIT,
            corrupt_records: CorruptRecordPolicy::default(),
            log_level: "warn".to_string(),
            company: CompanyProfile::default(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path. Missing file = defaults.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let config: Config = load_json(path)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub fn save(&self) -> Result<(), StoreError> {
        self.save_to(&Self::default_path())
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self)?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// The data directory in effect.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Derives the entitlement store settings.
    pub fn entitlement(&self) -> EntitlementConfig {
        EntitlementConfig {
            storage_key: QUOTA_KEY.to_string(),
            daily_limit: self.daily_limit,
            corrupt_records: self.corrupt_records,
        }
    }
}
