//! Snapshot assembly and atomic persistence.
//!
//! The snapshot is the sole contract consumed by downstream tooling: a
//! versioned JSON document mapping every configured asset and source to a
//! success-or-failure entry. It is assembled once per run, after every
//! fetch unit has settled, and written atomically so an interrupted run
//! never leaves a partial artifact under the final name.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{
    FetchFailure, FetchOutcome, MarketSummary, NewsItem, OhlcSeries, Symbol, UtcDateTime,
    ValidationError, WriteError,
};

/// Current artifact schema version. Evolution is additive only.
pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Per-source news entry; the source name is carried on both arms so a
/// failure never loses the identity of what failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceNews {
    pub source: String,
    pub outcome: FetchOutcome<Vec<NewsItem>>,
}

/// One immutable, versioned artifact capturing all fetch results of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: String,
    pub generated_at: UtcDateTime,
    pub assets: BTreeMap<Symbol, FetchOutcome<OhlcSeries>>,
    pub news: Vec<SourceNews>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub summaries: BTreeMap<Symbol, FetchOutcome<MarketSummary>>,
}

impl Snapshot {
    pub fn new(generated_at: UtcDateTime) -> Self {
        Self {
            schema_version: String::from(SCHEMA_VERSION),
            generated_at,
            assets: BTreeMap::new(),
            news: Vec::new(),
            summaries: BTreeMap::new(),
        }
    }

    /// Deterministic artifact name derived from the generation timestamp.
    ///
    /// Policy: date-granularity names; repeated runs on the same day
    /// overwrite the previous artifact predictably.
    pub fn file_name(&self) -> String {
        format!("snapshot_{}.json", self.generated_at.date().format_iso())
    }

    pub fn validate_schema_version(&self) -> Result<(), ValidationError> {
        if !is_valid_schema_version(&self.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }
        Ok(())
    }

    /// Degraded asset entries, for the run summary.
    pub fn failed_assets(&self) -> impl Iterator<Item = (&Symbol, &FetchFailure)> {
        self.assets
            .iter()
            .filter_map(|(symbol, outcome)| Some((symbol, outcome.error()?)))
    }

    /// Degraded source entries, for the run summary.
    pub fn failed_sources(&self) -> impl Iterator<Item = (&str, &FetchFailure)> {
        self.news
            .iter()
            .filter_map(|entry| Some((entry.source.as_str(), entry.outcome.error()?)))
    }
}

/// Writes snapshots with an atomic stage-then-rename discipline.
pub struct SnapshotWriter {
    output_dir: PathBuf,
    pretty: bool,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Serialize and persist one snapshot; single call per run.
    ///
    /// The document is staged in a temp file inside the destination
    /// directory and renamed into place, so either the complete artifact
    /// is visible under the final name or nothing is.
    pub fn write(&self, snapshot: &Snapshot) -> Result<PathBuf, WriteError> {
        snapshot.validate_schema_version()?;

        std::fs::create_dir_all(&self.output_dir).map_err(|source| WriteError::CreateDir {
            path: self.output_dir.display().to_string(),
            source,
        })?;

        let body = if self.pretty {
            serde_json::to_vec_pretty(snapshot)?
        } else {
            serde_json::to_vec(snapshot)?
        };

        let mut staged =
            NamedTempFile::new_in(&self.output_dir).map_err(|source| WriteError::Stage {
                path: self.output_dir.display().to_string(),
                source,
            })?;
        staged
            .write_all(&body)
            .map_err(|source| WriteError::Stage {
                path: self.output_dir.display().to_string(),
                source,
            })?;

        let destination = self.output_dir.join(snapshot.file_name());
        staged
            .persist(&destination)
            .map_err(|error| WriteError::Persist {
                path: destination.display().to_string(),
                source: error.error,
            })?;

        tracing::info!(path = %destination.display(), "snapshot written");

        Ok(destination)
    }
}

fn is_valid_schema_version(value: &str) -> bool {
    let Some(version) = value.strip_prefix('v') else {
        return false;
    };

    let mut parts = version.split('.');
    let major = parts.next();
    let minor = parts.next();
    let patch = parts.next();

    if parts.next().is_some() {
        return false;
    }

    [major, minor, patch].iter().all(|part| {
        part.is_some_and(|segment| {
            !segment.is_empty() && segment.chars().all(|ch| ch.is_ascii_digit())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot::new(UtcDateTime::parse("2024-01-15T06:30:00Z").expect("valid"))
    }

    #[test]
    fn file_name_is_derived_from_generation_date() {
        assert_eq!(snapshot().file_name(), "snapshot_2024-01-15.json");
    }

    #[test]
    fn rejects_malformed_schema_version() {
        let mut snap = snapshot();
        snap.schema_version = String::from("1.0.0");
        assert!(matches!(
            snap.validate_schema_version(),
            Err(ValidationError::InvalidSchemaVersion { .. })
        ));
    }

    #[test]
    fn writes_artifact_under_deterministic_name() {
        let dir = tempfile::tempdir().expect("tempdir must be available");
        let writer = SnapshotWriter::new(dir.path());

        let path = writer.write(&snapshot()).expect("write should succeed");
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("snapshot_2024-01-15.json")
        );

        let body = std::fs::read_to_string(&path).expect("artifact must be readable");
        let parsed: Snapshot = serde_json::from_str(&body).expect("artifact must round-trip");
        assert_eq!(parsed.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn same_day_rerun_overwrites_predictably() {
        let dir = tempfile::tempdir().expect("tempdir must be available");
        let writer = SnapshotWriter::new(dir.path());

        let first = writer.write(&snapshot()).expect("first write");
        let second = writer.write(&snapshot()).expect("second write");
        assert_eq!(first, second);

        let entries = std::fs::read_dir(dir.path())
            .expect("dir must be readable")
            .count();
        assert_eq!(entries, 1, "no staging leftovers may remain");
    }

    #[test]
    fn unwritable_destination_fails_without_artifact() {
        let dir = tempfile::tempdir().expect("tempdir must be available");
        let blocker = dir.path().join("snapshots");
        std::fs::write(&blocker, b"not a directory").expect("block the path");

        let writer = SnapshotWriter::new(&blocker);
        let error = writer.write(&snapshot()).expect_err("must fail");
        assert!(matches!(error, WriteError::CreateDir { .. }));
    }
}
