//! CLI argument definitions for marketbrief.
//!
//! The binary is a thin shell around the pipeline: it parses arguments,
//! loads the configuration, executes one collection run, and prints the
//! run summary. All domain logic lives in `marketbrief-core`.
//!
//! # Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--config` | required | Path to the JSON configuration document |
//! | `--output-dir` | `snapshots` | Directory receiving snapshot artifacts |
//! | `--timeout-ms` | `30000` | Per-fetch time budget in ms |
//! | `--pretty` | `false` | Pretty-print the snapshot JSON |
//! | `--no-summaries` | `false` | Skip LLM news condensation |
//!
//! # Examples
//!
//! ```bash
//! # Collect a snapshot with defaults
//! marketbrief --config config.json
//!
//! # Custom output directory, readable artifact, no LLM calls
//! marketbrief --config config.json --output-dir out --pretty --no-summaries
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Collect daily OHLC history and news into one versioned snapshot.
///
/// Individual asset or source failures degrade their own snapshot entry;
/// the run only fails when the configuration is invalid or the artifact
/// cannot be written.
#[derive(Debug, Parser)]
#[command(
    name = "marketbrief",
    author,
    version,
    about = "Daily market briefing snapshot collector"
)]
pub struct Cli {
    /// Path to the JSON configuration document.
    #[arg(long)]
    pub config: PathBuf,

    /// Directory receiving snapshot artifacts.
    #[arg(long, default_value = "snapshots")]
    pub output_dir: PathBuf,

    /// Per-fetch time budget in milliseconds.
    ///
    /// A fetch exceeding the budget becomes a timeout failure for its own
    /// entry; it is never retried within a run.
    #[arg(long, default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Pretty-print the snapshot JSON.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Skip LLM news condensation even when a credential is configured.
    #[arg(long, default_value_t = false)]
    pub no_summaries: bool,
}
