//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use orcamento_store::{Config, CorruptRecordPolicy, default_config_dir};
use tracing::info;

use super::AppContext;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration and data paths.
    Path,

    /// Set the free-tier daily limit.
    SetLimit {
        /// Quotes per day.
        limit: u32,
    },

    /// Set how unreadable stored records are handled.
    SetCorruptPolicy {
        /// propagate or fail-open.
        policy: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli, ctx: &AppContext) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, ctx),
        ConfigAction::Path => show_paths(cli, ctx),
        ConfigAction::SetLimit { limit } => set_limit(*limit, ctx),
        ConfigAction::SetCorruptPolicy { policy } => set_corrupt_policy(policy, ctx),
        ConfigAction::Reset => reset_config(ctx),
    }
}

fn show_config(cli: &Cli, ctx: &AppContext) -> Result<()> {
    let config = &ctx.config;

    match cli.format {
        OutputFormat::Text => {
            println!("Orçamento Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Daily limit:      {}", config.daily_limit);
            println!("Corrupt records:  {}", config.corrupt_records);
            println!("Log level:        {}", config.log_level);
            println!("Data dir:         {}", ctx.data_dir.display());
            println!();
            println!("Company:");
            println!("  {}", config.company.name);
            println!("  CNPJ: {}", config.company.tax_id);
            println!("  {}", config.company.address);
        }
        OutputFormat::Json => println!("{}", ctx.json(cli).format(config)?),
    }

    Ok(())
}

fn show_paths(cli: &Cli, ctx: &AppContext) -> Result<()> {
    let config_dir = default_config_dir();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:  {}", config_dir.display());
            println!("Config file: {}", ctx.config_path.display());
            println!("Data dir:    {}", ctx.data_dir.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "config_file": ctx.config_path.display().to_string(),
                "data_dir": ctx.data_dir.display().to_string(),
            });
            println!("{}", ctx.json(cli).format(&paths)?);
        }
    }

    Ok(())
}

fn set_limit(limit: u32, ctx: &AppContext) -> Result<()> {
    let config = Config {
        daily_limit: limit,
        ..ctx.config.clone()
    };
    config.save_to(&ctx.config_path)?;

    info!(limit, "Daily limit updated");
    println!("Daily limit set to: {limit}");

    Ok(())
}

fn set_corrupt_policy(policy: &str, ctx: &AppContext) -> Result<()> {
    let policy: CorruptRecordPolicy = policy.parse()?;
    let config = Config {
        corrupt_records: policy,
        ..ctx.config.clone()
    };
    config.save_to(&ctx.config_path)?;

    info!(%policy, "Corrupt-record policy updated");
    println!("Corrupt-record policy set to: {policy}");

    Ok(())
}

fn reset_config(ctx: &AppContext) -> Result<()> {
    let path = &ctx.config_path;

    if path.exists() {
        std::fs::remove_file(path)?;
        info!(path = %path.display(), "Configuration reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
