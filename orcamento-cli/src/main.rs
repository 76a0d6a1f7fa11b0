// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Orçamento CLI - quotes with a free daily allowance from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Show today's allowance (default command)
//! orcamento
//!
//! # Create a quote
//! orcamento quote new --title "Reforma" --client "Maria" \
//!     --item "Pintura;2,5;h;80" --item "Azulejo;12;m²;45,90"
//!
//! # List and render quotes
//! orcamento quote list
//! orcamento quote show <id>
//!
//! # Change a quote's status
//! orcamento quote status <id> approved
//!
//! # Demo controls
//! orcamento premium activate
//! orcamento reset
//!
//! # JSON output
//! orcamento --format json --pretty quota
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use orcamento_core::CoreError;
use orcamento_store::StoreError;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

use commands::{QuotaExhausted, config, premium, quota, quote};

// ============================================================================
// CLI Definition
// ============================================================================

/// Orçamento CLI - quotes with a daily free allowance.
#[derive(Parser)]
#[command(name = "orcamento")]
#[command(about = "Quote documents with a daily free allowance")]
#[command(long_about = r#"
Orçamento keeps quote documents and a daily allowance of free quotes.

Free plan: 3 new quotes per day, reset at midnight (UTC).
Premium (demo): unlimited quotes.

Examples:
  orcamento                          # Today's allowance
  orcamento quote new --title T --client C --item "Item;1;un;100"
  orcamento quote list               # All quotes, newest first
  orcamento quote status <id> approved
  orcamento premium activate         # Demo upgrade
  orcamento --format json quota      # JSON output
"#)]
#[command(version)]
#[command(author = "Orçamento Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'quota' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Directory holding the data files (overrides the config file).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Configuration file to use instead of the default one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show today's allowance (default if no command specified).
    Quota,

    /// Premium demo controls.
    #[command(visible_alias = "p")]
    Premium(premium::PremiumArgs),

    /// Reset today's usage counter (demo control).
    Reset,

    /// Create, list, show and update quotes.
    #[command(visible_alias = "q")]
    Quote(quote::QuoteArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Daily free allowance used up.
    QuotaExhausted = 2,
    /// Bad input or unreadable stored data.
    ParseError = 3,
    /// Quote not found.
    NotFound = 4,
}

impl ExitCode {
    /// Picks the exit code for a failed command.
    pub fn for_error(err: &anyhow::Error) -> Self {
        if err.is::<QuotaExhausted>() {
            return Self::QuotaExhausted;
        }
        if let Some(store) = err.downcast_ref::<StoreError>() {
            return match store {
                StoreError::QuoteNotFound(_) => Self::NotFound,
                StoreError::CorruptRecord { .. }
                | StoreError::InvalidKey(_)
                | StoreError::Config(_)
                | StoreError::Core(_) => Self::ParseError,
                _ => Self::Error,
            };
        }
        if err.is::<CoreError>() {
            return Self::ParseError;
        }
        Self::Error
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

/// Handle used to swap in the configured log level once the config is read.
type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Builds the log filter: `--verbose` wins, then the configured level.
/// An unparsable level falls back to `warn`.
fn log_filter(verbose: bool, level: &str) -> EnvFilter {
    if verbose {
        EnvFilter::new("orcamento=debug,info")
    } else {
        EnvFilter::try_new(format!("orcamento={level}"))
            .unwrap_or_else(|_| EnvFilter::new("orcamento=warn"))
    }
}

/// Installs the subscriber from the CLI flags alone, before any config is read.
fn setup_logging(verbose: bool, quiet: bool) -> Option<FilterHandle> {
    if quiet {
        return None; // No logging in quiet mode
    }

    let (filter, handle) = reload::Layer::new(log_filter(verbose, "warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
    Some(handle)
}

/// Applies the config file's `log_level` unless `--verbose` already set one.
fn apply_config_level(handle: Option<&FilterHandle>, verbose: bool, level: &str) {
    let Some(handle) = handle else { return };
    if verbose {
        return;
    }
    if let Err(e) = handle.reload(log_filter(false, level)) {
        warn!(error = %e, "Could not apply configured log level");
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let log_handle = setup_logging(cli.verbose, cli.quiet);

    let result = commands::AppContext::from_cli(&cli).and_then(|ctx| {
        apply_config_level(log_handle.as_ref(), cli.verbose, &ctx.config.log_level);
        run(&cli, &ctx)
    });

    if let Err(e) = result {
        let code = ExitCode::for_error(&e);
        debug!(error = ?e, code = code as i32, "Command failed");
        // The upsell prompt was already printed.
        if code != ExitCode::QuotaExhausted && !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(code as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}

fn run(cli: &Cli, ctx: &commands::AppContext) -> Result<()> {
    match &cli.command {
        Some(Commands::Quota) | None => quota::run(cli, ctx),
        Some(Commands::Premium(args)) => premium::run(args, cli, ctx),
        Some(Commands::Reset) => premium::run_reset(cli, ctx),
        Some(Commands::Quote(args)) => quote::run(args, cli, ctx),
        Some(Commands::Config(args)) => config::run(args, cli, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orcamento_core::QuoteId;

    #[test]
    fn test_cli_parses_default_command() {
        let cli = Cli::try_parse_from(["orcamento"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_parses_quote_new() {
        let cli = Cli::try_parse_from([
            "orcamento",
            "--format",
            "json",
            "quote",
            "new",
            "--title",
            "Site",
            "--client",
            "ACME",
            "--item",
            "Design;1;un;1500",
            "--hide-number",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Some(Commands::Quote(_))));
    }

    #[test]
    fn test_exit_codes() {
        let exhausted = anyhow::Error::new(QuotaExhausted { used: 3, limit: 3 });
        assert_eq!(ExitCode::for_error(&exhausted), ExitCode::QuotaExhausted);

        let missing = anyhow::Error::new(StoreError::QuoteNotFound(QuoteId::new()));
        assert_eq!(ExitCode::for_error(&missing), ExitCode::NotFound);

        let bad_status = anyhow::Error::new(CoreError::InvalidStatus("done".into()));
        assert_eq!(ExitCode::for_error(&bad_status), ExitCode::ParseError);

        let other = anyhow::anyhow!("boom");
        assert_eq!(ExitCode::for_error(&other), ExitCode::Error);
    }

    #[test]
    fn test_log_filter_levels() {
        assert!(log_filter(true, "error").to_string().contains("orcamento=debug"));
        assert_eq!(log_filter(false, "info").to_string(), "orcamento=info");
        assert_eq!(log_filter(false, "loud").to_string(), "orcamento=warn");
    }
}
