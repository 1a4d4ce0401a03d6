//! dokimos - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dokimos::{Config, GitCli, LanguageSet, OpenAiClient, Pipeline};

/// Generate unit tests for files changed in the latest commit.
#[derive(Parser, Debug)]
#[command(name = "dokimos")]
#[command(about = "Generate unit tests for files changed in the latest commit")]
#[command(version)]
struct Cli {
    /// Path to the repository (defaults to the current directory)
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Comma-separated languages to generate tests for (overrides LANGUAGES)
    #[arg(long)]
    languages: Option<String>,

    /// Model identifier (overrides MODEL)
    #[arg(long)]
    model: Option<String>,

    /// List the files that would get tests, without generating or committing
    #[arg(long)]
    dry_run: bool,

    /// Exit with status 1 if any file or the commit/push step failed
    #[arg(long)]
    fail_on_error: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    // Step 1: Build configuration
    let mut config = Config::from_env();
    if let Some(languages) = cli.languages.as_deref() {
        config.languages = LanguageSet::parse(languages);
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    config.repo_path = cli.repo;
    config.dry_run = cli.dry_run;
    config.fail_on_error = cli.fail_on_error;
    config.validate().context("Invalid configuration")?;

    info!(
        "Languages: {}, model: {}, event: {}",
        config.languages,
        config.model,
        config.event_name.as_deref().unwrap_or("(none)")
    );

    // Step 2: Wire collaborators
    let vcs = GitCli::new(&config.repo_path, config.event_name.clone());
    // Dry runs never call the service, so they may run without a key.
    let api_key = if config.dry_run {
        String::new()
    } else {
        config.require_api_key()?.to_string()
    };
    let client = OpenAiClient::new(config.base_url.clone(), api_key, config.model.clone());

    // Step 3: Run
    let report = Pipeline::new(&config, &vcs, &client)
        .run()
        .await
        .context("Failed to determine files changed in the latest commit")?;

    info!(
        "Done: {} of {} file(s) produced tests, {} failed",
        report.artifacts.len(),
        report.change_set.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        warn!("  {} ({}): {}", failure.path, failure.error.kind(), failure.error);
    }

    let code = report.exit_code(config.fail_on_error);
    Ok(ExitCode::from(code as u8))
}
