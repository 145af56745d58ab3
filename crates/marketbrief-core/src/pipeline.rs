//! The fetch-normalize-snapshot pipeline.
//!
//! Every per-asset and per-source fetch is an independent unit of work:
//! units run concurrently, carry their own timeout, and share no mutable
//! state. A barrier joins all units before the snapshot is assembled by a
//! single-threaded fold, so the writer never observes a partial fetch set.
//! If the process dies before the barrier, no artifact is written.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use crate::config::Config;
use crate::http_client::HttpClient;
use crate::news::{summarizer::CREDENTIAL_ENV, NewsFetcher, RawNewsBatch, Summarizer};
use crate::normalize::{normalize_news, normalize_series};
use crate::provider::{ProviderSet, RawSeries};
use crate::snapshot::{Snapshot, SnapshotWriter, SourceNews};
use crate::{FetchFailure, FetchOutcome, PipelineError, UtcDateTime};

/// Default per-fetch time budget.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Explicit per-run context. Constructed once at startup and passed by
/// reference to each stage; there is no process-wide mutable state.
pub struct RunContext {
    pub config: Config,
    pub http: Arc<dyn HttpClient>,
    pub credential: Option<String>,
    pub fetch_timeout: Duration,
    pub output_dir: PathBuf,
    pub pretty: bool,
    pub summaries_enabled: bool,
}

impl RunContext {
    pub fn new(config: Config, http: Arc<dyn HttpClient>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            http,
            credential: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            output_dir: output_dir.into(),
            pretty: false,
            summaries_enabled: true,
        }
    }

    /// Read the bearer credential from the process environment.
    pub fn with_credential_from_env(mut self) -> Self {
        self.credential = std::env::var(CREDENTIAL_ENV).ok();
        self
    }

    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_summaries(mut self, enabled: bool) -> Self {
        self.summaries_enabled = enabled;
        self
    }
}

/// One line of the operator-facing run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeLine {
    pub id: String,
    pub detail: String,
    pub failure: Option<FetchFailure>,
}

impl OutcomeLine {
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Result of a completed run. The run as a whole succeeded: the snapshot
/// was written, even if individual entries degraded.
#[derive(Debug)]
pub struct RunReport {
    pub snapshot_path: PathBuf,
    pub snapshot: Snapshot,
    pub asset_lines: Vec<OutcomeLine>,
    pub source_lines: Vec<OutcomeLine>,
    pub summary_lines: Vec<OutcomeLine>,
}

impl RunReport {
    pub fn degraded_count(&self) -> usize {
        self.asset_lines
            .iter()
            .chain(&self.source_lines)
            .chain(&self.summary_lines)
            .filter(|line| !line.is_success())
            .count()
    }
}

/// Execute one collection run: fan out, join, normalize, write.
pub async fn run(ctx: &RunContext) -> Result<RunReport, PipelineError> {
    // The two fetchers are peers: a broken news source must not delay OHLC
    // delivery, and vice versa.
    let (raw_series, raw_news) = tokio::join!(fetch_all_series(ctx), fetch_all_news(ctx));

    // Barrier passed: every fetch unit has settled. Everything below is a
    // single-threaded fold over immutable results.
    let mut snapshot = Snapshot::new(UtcDateTime::now());

    for (asset, raw) in ctx.config.assets.iter().zip(raw_series) {
        let outcome = normalize_series(raw, asset);
        match outcome.error() {
            None => tracing::info!(symbol = %asset.symbol, "asset series collected"),
            Some(failure) => tracing::warn!(
                symbol = %asset.symbol,
                code = failure.code(),
                "asset series degraded: {}",
                failure.message,
            ),
        }
        snapshot.assets.insert(asset.symbol.clone(), outcome);
    }

    for (source, raw) in ctx.config.sources.iter().zip(raw_news) {
        let outcome = normalize_news(raw, source, &ctx.config.assets);
        match outcome.error() {
            None => tracing::info!(source = %source.name, "news collected"),
            Some(failure) => tracing::warn!(
                source = %source.name,
                code = failure.code(),
                "news degraded: {}",
                failure.message,
            ),
        }
        snapshot.news.push(SourceNews {
            source: source.name.clone(),
            outcome,
        });
    }

    if ctx.summaries_enabled {
        summarize_assets(ctx, &mut snapshot).await;
    }

    let writer = SnapshotWriter::new(&ctx.output_dir).pretty(ctx.pretty);
    let snapshot_path = writer.write(&snapshot)?;

    let report = build_report(snapshot_path, snapshot);
    tracing::info!(
        degraded = report.degraded_count(),
        path = %report.snapshot_path.display(),
        "run complete"
    );

    Ok(report)
}

async fn fetch_all_series(ctx: &RunContext) -> Vec<FetchOutcome<RawSeries>> {
    let providers = Arc::new(ProviderSet::new(ctx.http.clone()));

    // Placeholders guarantee an entry per asset even if a task is lost.
    let mut outcomes: Vec<FetchOutcome<RawSeries>> = ctx
        .config
        .assets
        .iter()
        .map(|_| FetchOutcome::failure(FetchFailure::internal("fetch task aborted")))
        .collect();

    let mut tasks: JoinSet<(usize, FetchOutcome<RawSeries>)> = JoinSet::new();
    for (index, asset) in ctx.config.assets.iter().cloned().enumerate() {
        let providers = providers.clone();
        let budget = ctx.fetch_timeout;
        tasks.spawn(async move {
            tracing::debug!(symbol = %asset.symbol, provider = %asset.provider, "fetching series");
            let provider = providers.get(asset.provider);
            let outcome = match tokio::time::timeout(budget, provider.fetch_history(&asset)).await
            {
                Ok(result) => FetchOutcome::from(result),
                Err(_) => FetchOutcome::failure(FetchFailure::timeout(format!(
                    "series fetch for {} exceeded {}ms",
                    asset.symbol,
                    budget.as_millis(),
                ))),
            };
            (index, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Ok((index, outcome)) = joined {
            outcomes[index] = outcome;
        }
    }

    outcomes
}

async fn fetch_all_news(ctx: &RunContext) -> Vec<FetchOutcome<RawNewsBatch>> {
    let fetcher = Arc::new(NewsFetcher::new(ctx.http.clone()));

    let mut outcomes: Vec<FetchOutcome<RawNewsBatch>> = ctx
        .config
        .sources
        .iter()
        .map(|_| FetchOutcome::failure(FetchFailure::internal("fetch task aborted")))
        .collect();

    let mut tasks: JoinSet<(usize, FetchOutcome<RawNewsBatch>)> = JoinSet::new();
    for (index, source) in ctx.config.sources.iter().cloned().enumerate() {
        let fetcher = fetcher.clone();
        let assets = ctx.config.assets.clone();
        let budget = ctx.fetch_timeout;
        tasks.spawn(async move {
            tracing::debug!(source = %source.name, kind = %source.kind, "fetching news");
            let outcome = match tokio::time::timeout(budget, fetcher.fetch(&source, &assets)).await
            {
                Ok(result) => FetchOutcome::from(result),
                Err(_) => FetchOutcome::failure(FetchFailure::timeout(format!(
                    "news fetch for '{}' exceeded {}ms",
                    source.name,
                    budget.as_millis(),
                ))),
            };
            (index, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Ok((index, outcome)) = joined {
            outcomes[index] = outcome;
        }
    }

    outcomes
}

async fn summarize_assets(ctx: &RunContext, snapshot: &mut Snapshot) {
    let summarizer = Summarizer::new(
        ctx.http.clone(),
        ctx.credential.clone(),
        ctx.config.summary_model.clone(),
    );

    for asset in &ctx.config.assets {
        let items: Vec<_> = snapshot
            .news
            .iter()
            .filter_map(|entry| entry.outcome.data())
            .flatten()
            .filter(|item| item.mentions(&asset.symbol))
            .cloned()
            .collect();

        let outcome =
            match tokio::time::timeout(ctx.fetch_timeout, summarizer.summarize(asset, &items))
                .await
            {
                Ok(result) => FetchOutcome::from(result),
                Err(_) => FetchOutcome::failure(FetchFailure::timeout(format!(
                    "summary for {} exceeded {}ms",
                    asset.symbol,
                    ctx.fetch_timeout.as_millis(),
                ))),
            };

        snapshot.summaries.insert(asset.symbol.clone(), outcome);
    }
}

fn build_report(snapshot_path: PathBuf, snapshot: Snapshot) -> RunReport {
    let asset_lines = snapshot
        .assets
        .iter()
        .map(|(symbol, outcome)| OutcomeLine {
            id: symbol.to_string(),
            detail: match outcome.data() {
                Some(series) => format!("{} points", series.len()),
                None => String::new(),
            },
            failure: outcome.error().cloned(),
        })
        .collect();

    let source_lines = snapshot
        .news
        .iter()
        .map(|entry| OutcomeLine {
            id: entry.source.clone(),
            detail: match entry.outcome.data() {
                Some(items) => format!("{} items", items.len()),
                None => String::new(),
            },
            failure: entry.outcome.error().cloned(),
        })
        .collect();

    let summary_lines = snapshot
        .summaries
        .iter()
        .map(|(symbol, outcome)| OutcomeLine {
            id: symbol.to_string(),
            detail: match outcome.data() {
                Some(summary) => format!("sentiment {:?}", summary.sentiment),
                None => String::new(),
            },
            failure: outcome.error().cloned(),
        })
        .collect();

    RunReport {
        snapshot_path,
        snapshot,
        asset_lines,
        source_lines,
        summary_lines,
    }
}
