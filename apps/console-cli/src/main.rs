#![allow(clippy::print_stdout, clippy::print_stderr)]

mod commands;
mod config;
mod logging;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use console_api::HttpConsoleApi;
use console_session::{FileStorage, SessionStore};
use console_shell::ConsoleSession;

use crate::commands::Command;
use crate::config::{AppConfig, SessionConfig, StorageBackend};

/// Leasing console - session, scope and navigation from the terminal
#[derive(Parser)]
#[command(name = "leasing-console")]
#[command(about = "Leasing console - session, scope and navigation from the terminal")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session file override (takes precedence over config)
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // defaults -> YAML (if provided) -> env (CONSOLE__*) -> CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(file) = cli.session_file {
        config.session.backend = StorageBackend::File;
        config.session.file = Some(file);
    }

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    logging::init(&config.logging, cli.verbose)?;

    let Some(command) = cli.command else {
        eprintln!("no command given; see --help");
        return Ok(());
    };

    let session = build_session(&config)?;
    let output = commands::execute(&session, command).await?;
    println!("{output}");
    Ok(())
}

fn open_store(config: &SessionConfig) -> Result<SessionStore> {
    if config.backend == StorageBackend::Memory {
        return Ok(SessionStore::in_memory());
    }

    let path = config.resolve_file()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    tracing::debug!(path = %path.display(), "opening session file");
    Ok(SessionStore::new(Arc::new(FileStorage::open(&path)?)))
}

fn build_session(config: &AppConfig) -> Result<ConsoleSession> {
    let store = open_store(&config.session)?;
    let api = HttpConsoleApi::new(&config.api, store.clone())?;
    Ok(ConsoleSession::new(
        Arc::new(api),
        store,
        config.shell.clone(),
    )?)
}
