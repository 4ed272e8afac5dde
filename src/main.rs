//! monitor-editais: binary entrypoint.
//! Reads configuration, collects recent funding calls and emails the digest.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use monitor_editais::config::load_app_config;
use monitor_editais::{execute, RunOptions};

#[derive(Debug, Parser)]
#[command(name = "monitor-editais", version, about)]
struct Cli {
    /// YAML file with `rss_sources` / `html_sources` overrides.
    #[arg(long, value_name = "PATH")]
    sources: Option<PathBuf>,

    /// TOML file with `positive` / `negative` keyword patterns.
    #[arg(long, value_name = "PATH")]
    keywords: Option<PathBuf>,

    /// CSV log to append to.
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Print the digest only; no email, no CSV.
    #[arg(long)]
    dry_run: bool,
}

/// Logs go to stderr so stdout carries only the digest preview.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("monitor_editais=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

async fn try_main(cli: Cli) -> Result<()> {
    let mut config = load_app_config().context("reading configuration")?;
    if let Some(p) = cli.sources {
        config.sources_path = p;
    }
    if let Some(p) = cli.keywords {
        config.keywords_path = Some(p);
    }
    if let Some(p) = cli.csv {
        config.csv_path = p;
    }

    let opts = RunOptions {
        config,
        dry_run: cli.dry_run,
    };
    let report = execute(&opts).await?;
    tracing::info!(
        items = report.items.len(),
        notified = report.notified,
        csv_written = report.csv_written,
        "run finished"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    match try_main(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "run failed");
            ExitCode::FAILURE
        }
    }
}
