//! duotimer - a two-channel focus/break countdown timer
//!
//! Keeps a deep-work interval and a break countdown side by side:
//! - Only one channel counts down at a time
//! - Durations and progress persist between sessions
//! - A desktop notification fires when a countdown completes

use std::io::Write;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use duotimer::cli::{open_offline_store, session, Cli, Commands, Display};
use duotimer::config::AppConfig;
use duotimer::types::Channel;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    let code = match execute(cli).await {
        Ok(()) => 0,
        Err(e) => {
            Display::show_error(&format!("{e:#}"));
            1
        }
    };

    // Exit without waiting on the blocking stdin reader of a quit session.
    let _ = std::io::stdout().flush();
    std::process::exit(code);
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence; otherwise `warn`, or `info` with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let Some(command) = cli.command.clone() else {
        // No command provided, show help
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Run(args) => {
            let config = resolve_config(&cli)?;
            session::run(&config, &args).await?;
        }
        Commands::Status => {
            let store = open_offline_store(&resolve_config(&cli)?);
            let rows: Vec<_> = Channel::ALL
                .into_iter()
                .map(|channel| (channel, store.channel(channel)))
                .collect();
            Display::show_status(&rows, None);
        }
        Commands::SetDefault { channel, minutes } => {
            let seconds = channel
                .limits()
                .validate_minutes(minutes)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid duration for {channel}"))?;
            let mut store = open_offline_store(&resolve_config(&cli)?);
            store.set_default(channel, seconds);
            Display::show_default_updated(channel, &store.channel(channel));
        }
        Commands::Set { channel, seconds } => {
            let mut store = open_offline_store(&resolve_config(&cli)?);
            store.set_remaining(channel, seconds);
            Display::show_remaining_updated(channel, &store.channel(channel));
        }
        Commands::Reset { channel } => {
            let mut store = open_offline_store(&resolve_config(&cli)?);
            store.reset(channel);
            Display::show_reset(channel, &store.channel(channel));
        }
        Commands::Completions { shell } => generate_completions(shell),
    }

    Ok(())
}

/// Resolves the data directory from the flag, environment or platform default.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    AppConfig::resolve(cli.data_dir.as_deref()).context("failed to resolve configuration")
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
