//! CLI command implementations.

pub mod config;
pub mod premium;
pub mod quota;
pub mod quote;

use anyhow::{Context, Result};
use orcamento_core::{Clock, SystemClock};
use orcamento_store::{Config, EntitlementStore, FileBackend, KeyValueBackend, QuoteStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::Cli;
use crate::output::{JsonFormatter, TextFormatter};

/// Creation refused because the free allowance for today is used up.
///
/// Carried through `anyhow` so `main` can pick the exit code; the upsell
/// prompt itself is printed by the command.
#[derive(Debug, Error)]
#[error("Daily quote limit reached ({used}/{limit})")]
pub struct QuotaExhausted {
    pub used: u32,
    pub limit: u32,
}

/// Stores and settings shared by every command.
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub entitlements: EntitlementStore,
    pub quotes: QuoteStore,
}

impl AppContext {
    /// Loads the configuration named by the CLI flags and opens the stores.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
        let config = Config::load_from(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?;
        let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir());
        Self::open(config, config_path, &data_dir)
    }

    /// Opens file-backed stores under `data_dir`.
    pub fn open(config: Config, config_path: PathBuf, data_dir: &Path) -> Result<Self> {
        let backend: Arc<dyn KeyValueBackend> = Arc::new(
            FileBackend::open(data_dir)
                .with_context(|| format!("opening data directory {}", data_dir.display()))?,
        );
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        debug!(data_dir = %data_dir.display(), "Opened stores");

        let entitlements =
            EntitlementStore::new(Arc::clone(&backend), Arc::clone(&clock), config.entitlement());
        let quotes = QuoteStore::new(backend, clock).with_corrupt_policy(config.corrupt_records);

        Ok(Self {
            config,
            config_path,
            data_dir: data_dir.to_path_buf(),
            entitlements,
            quotes,
        })
    }

    /// Text formatter honoring `--no-color` and the configured company.
    pub fn text(&self, cli: &Cli) -> TextFormatter {
        TextFormatter::new(!cli.no_color).with_company(self.config.company.clone())
    }

    /// JSON formatter honoring `--pretty`.
    pub fn json(&self, cli: &Cli) -> JsonFormatter {
        JsonFormatter::new(cli.pretty)
    }
}
