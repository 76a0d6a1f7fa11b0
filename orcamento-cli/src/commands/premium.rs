//! Premium demo controls: activate, deactivate and reset the daily counter.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use super::AppContext;
use crate::{Cli, OutputFormat};

/// Arguments for the premium command.
#[derive(Args)]
pub struct PremiumArgs {
    #[command(subcommand)]
    pub action: PremiumAction,
}

/// Premium subcommands.
#[derive(Subcommand)]
pub enum PremiumAction {
    /// Unlock unlimited quotes (demo, no payment).
    Activate,

    /// Return to the free plan. Today's count is kept.
    Deactivate,
}

/// Runs the premium command.
pub fn run(args: &PremiumArgs, cli: &Cli, ctx: &AppContext) -> Result<()> {
    let message = match args.action {
        PremiumAction::Activate => {
            ctx.entitlements.activate_premium()?;
            info!("Premium activated");
            "Premium activated."
        }
        PremiumAction::Deactivate => {
            ctx.entitlements.deactivate_premium()?;
            info!("Premium deactivated");
            "Premium deactivated."
        }
    };
    print_status(message, cli, ctx)
}

/// Runs the reset command.
pub fn run_reset(cli: &Cli, ctx: &AppContext) -> Result<()> {
    ctx.entitlements.reset_usage_demo()?;
    info!("Daily usage reset");
    print_status("Usage reset for today.", cli, ctx)
}

fn print_status(message: &str, cli: &Cli, ctx: &AppContext) -> Result<()> {
    let status = ctx.entitlements.status()?;
    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{message}");
            }
            println!("{}", ctx.text(cli).format_badge(&status));
        }
        OutputFormat::Json => println!("{}", ctx.json(cli).format_quota(status)?),
    }
    Ok(())
}
