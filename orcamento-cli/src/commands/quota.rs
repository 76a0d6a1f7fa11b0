//! Quota command - show today's allowance.

use anyhow::Result;
use tracing::debug;

use super::AppContext;
use crate::{Cli, OutputFormat};

/// Runs the quota command.
pub fn run(cli: &Cli, ctx: &AppContext) -> Result<()> {
    let status = ctx.entitlements.status()?;
    debug!(used = status.used, premium = status.premium, "Quota status");

    match cli.format {
        OutputFormat::Text => println!("{}", ctx.text(cli).format_quota(&status)),
        OutputFormat::Json => println!("{}", ctx.json(cli).format_quota(status)?),
    }

    Ok(())
}
