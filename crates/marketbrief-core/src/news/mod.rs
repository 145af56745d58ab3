//! News sources and the optional summarizer.
//!
//! Each configured source is fetched once per run, independently of every
//! other source and of all market-data fetches. Source responses stay in
//! tagged [`RawNewsBatch`] payloads; the normalizer converts them to
//! canonical [`crate::NewsItem`] records and associates asset symbols.
//!
//! | Source kind | Module | Transport | Payload |
//! |-------------|--------|-----------|---------|
//! | GDELT DOC 2.0 | [`gdelt`] | article search API | JSON |
//! | Yahoo Finance | [`yahoo_news`] | search news endpoint | JSON |

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{AssetSpec, SourceSpec};
use crate::http_client::HttpClient;
use crate::FetchFailure;

pub mod gdelt;
pub mod summarizer;
pub mod yahoo_news;

pub use gdelt::GdeltArticle;
pub use summarizer::Summarizer;
pub use yahoo_news::YahooNewsStory;

/// Kind of a configured news source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Gdelt,
    YahooFinance,
}

impl SourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gdelt => "gdelt",
            Self::YahooFinance => "yahoo_finance",
        }
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-tagged raw news payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RawNewsBatch {
    Gdelt(Vec<GdeltArticle>),
    Yahoo(Vec<YahooNewsStory>),
}

impl RawNewsBatch {
    pub fn len(&self) -> usize {
        match self {
            Self::Gdelt(articles) => articles.len(),
            Self::Yahoo(stories) => stories.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetches one source's most recent items.
pub struct NewsFetcher {
    http: Arc<dyn HttpClient>,
}

impl NewsFetcher {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Query the source, walking its query tiers in order.
    ///
    /// A tier that parses but yields zero items falls through to the next
    /// tier; a transport or parse problem fails the source (single pass,
    /// no retries). All tiers empty is a valid empty batch, not a failure.
    pub async fn fetch(
        &self,
        source: &SourceSpec,
        assets: &[AssetSpec],
    ) -> Result<RawNewsBatch, FetchFailure> {
        let queries = expand_queries(source, assets);

        let mut batch = match source.kind {
            SourceKind::Gdelt => RawNewsBatch::Gdelt(Vec::new()),
            SourceKind::YahooFinance => RawNewsBatch::Yahoo(Vec::new()),
        };

        for (tier, query) in queries.iter().enumerate() {
            tracing::debug!(source = %source.name, tier, query = %query, "news query tier");

            let candidate = match source.kind {
                SourceKind::Gdelt => {
                    RawNewsBatch::Gdelt(gdelt::fetch(&self.http, query, source.max_items).await?)
                }
                SourceKind::YahooFinance => RawNewsBatch::Yahoo(
                    yahoo_news::fetch(&self.http, query, source.max_items).await?,
                ),
            };

            if !candidate.is_empty() {
                batch = candidate;
                break;
            }
        }

        Ok(batch)
    }
}

/// Expand a source's query tiers against the assets it covers.
///
/// `{symbols}` becomes the covered symbols joined with ` OR `; `{names}`
/// becomes the covered display names, each quoted, joined with ` OR `.
/// Templates without placeholders pass through unchanged.
pub fn expand_queries(source: &SourceSpec, assets: &[AssetSpec]) -> Vec<String> {
    let covered = source.covered_symbols(assets);

    let symbols = covered
        .iter()
        .map(|symbol| symbol.as_str().to_owned())
        .collect::<Vec<_>>()
        .join(" OR ");

    let names = assets
        .iter()
        .filter(|asset| covered.contains(&&asset.symbol))
        .map(|asset| format!("\"{}\"", asset.name))
        .collect::<Vec<_>>()
        .join(" OR ");

    source
        .queries
        .iter()
        .filter(|template| !template.trim().is_empty())
        .map(|template| {
            template
                .replace("{symbols}", &symbols)
                .replace("{names}", &names)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::config::SourceCoverage;
    use crate::provider::ProviderId;
    use crate::{AssetCategory, Symbol};

    use super::*;

    fn assets() -> Vec<AssetSpec> {
        vec![
            AssetSpec {
                symbol: Symbol::parse("XAU").expect("valid"),
                provider: ProviderId::Yahoo,
                provider_symbol: String::from("GC=F"),
                name: String::from("Gold Futures"),
                category: AssetCategory::Commodity,
            },
            AssetSpec {
                symbol: Symbol::parse("BTC").expect("valid"),
                provider: ProviderId::Stooq,
                provider_symbol: String::from("btcusd"),
                name: String::from("Bitcoin"),
                category: AssetCategory::Crypto,
            },
        ]
    }

    #[test]
    fn expands_placeholders_for_covered_subset() {
        let source = SourceSpec {
            name: String::from("wire"),
            kind: SourceKind::Gdelt,
            queries: vec![String::from("{names} market"), String::from("{symbols}")],
            coverage: SourceCoverage::Symbols(vec![Symbol::parse("XAU").expect("valid")]),
            max_items: 3,
        };

        let queries = expand_queries(&source, &assets());
        assert_eq!(queries[0], "\"Gold Futures\" market");
        assert_eq!(queries[1], "XAU");
    }

    #[test]
    fn wildcard_expands_over_all_assets() {
        let source = SourceSpec {
            name: String::from("wire"),
            kind: SourceKind::YahooFinance,
            queries: vec![String::from("{symbols}")],
            coverage: SourceCoverage::All,
            max_items: 3,
        };

        let queries = expand_queries(&source, &assets());
        assert_eq!(queries[0], "XAU OR BTC");
    }

    #[test]
    fn passes_plain_queries_through() {
        let source = SourceSpec {
            name: String::from("wire"),
            kind: SourceKind::Gdelt,
            queries: vec![String::from("precious metals outlook")],
            coverage: SourceCoverage::All,
            max_items: 3,
        };

        let queries = expand_queries(&source, &assets());
        assert_eq!(queries, vec![String::from("precious metals outlook")]);
    }
}
