mod cli;
mod error;
mod report;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use marketbrief_core::{Config, ReqwestHttpClient, RunContext};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;

    let ctx = RunContext::new(config, Arc::new(ReqwestHttpClient::new()), cli.output_dir)
        .with_credential_from_env()
        .with_fetch_timeout(Duration::from_millis(cli.timeout_ms))
        .with_pretty(cli.pretty)
        .with_summaries(!cli.no_summaries);

    let run_report = marketbrief_core::run(&ctx).await?;
    report::render(&run_report);

    // Partial degradation is not a run failure; the artifact was written.
    Ok(ExitCode::SUCCESS)
}
