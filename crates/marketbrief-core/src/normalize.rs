//! Provider-agnostic normalization.
//!
//! Pure conversion of tagged raw payloads into canonical records. All
//! provider quirks stop here: date and number formats are unified, null
//! markers become missing fields, oversized text is clipped, and records
//! that violate the OHLC ordering invariant after coercion become scoped
//! failures instead of silently wrong data.
//!
//! Same-date tie-break policy: when two points share a date, the last one
//! seen in provider order wins.

use std::collections::BTreeMap;

use crate::config::{AssetSpec, SourceCoverage, SourceSpec};
use crate::news::RawNewsBatch;
use crate::provider::RawSeries;
use crate::{
    FetchFailure, FetchOutcome, MarketDate, NewsItem, OhlcPoint, OhlcSeries, Symbol, UtcDateTime,
};

/// Upper bound on canonical summary text, matching the source's own
/// extraction limit.
pub const MAX_SUMMARY_CHARS: usize = 4_000;

/// Upper bound on canonical headline text.
pub const MAX_HEADLINE_CHARS: usize = 300;

/// Convert one asset's raw price payload into a canonical series.
pub fn normalize_series(
    outcome: FetchOutcome<RawSeries>,
    asset: &AssetSpec,
) -> FetchOutcome<OhlcSeries> {
    outcome.and_then(|raw| {
        let points = match raw {
            RawSeries::Yahoo(result) => decode_yahoo(&result)?,
            RawSeries::Stooq(rows) => decode_stooq(&rows)?,
        };
        canonicalize_points(asset.symbol.clone(), points)
    })
}

/// Sort ascending, apply the last-wins duplicate-date policy, and build
/// the canonical series. Idempotent: canonical input maps to itself.
pub fn canonicalize_points(
    symbol: Symbol,
    points: Vec<OhlcPoint>,
) -> Result<OhlcSeries, FetchFailure> {
    let mut by_date: BTreeMap<MarketDate, OhlcPoint> = BTreeMap::new();
    for point in points {
        by_date.insert(point.ts, point);
    }

    if by_date.is_empty() {
        return Err(FetchFailure::empty("no usable points after normalization"));
    }

    OhlcSeries::new(symbol, by_date.into_values().collect())
        .map_err(|error| FetchFailure::normalization(error.to_string()))
}

fn decode_yahoo(
    result: &crate::provider::YahooChartResult,
) -> Result<Vec<OhlcPoint>, FetchFailure> {
    let timestamps = result.timestamp.as_deref().unwrap_or_default();
    let quote = result.indicators.quote.first();

    let mut points = Vec::with_capacity(timestamps.len());
    for (index, &epoch) in timestamps.iter().enumerate() {
        let ts = MarketDate::from_unix_timestamp(epoch)
            .map_err(|error| FetchFailure::parse(error.to_string()))?;

        let price_at = |values: Option<&Vec<Option<f64>>>| {
            values
                .and_then(|column| column.get(index).copied().flatten())
                .and_then(coerce_price)
        };

        let point = OhlcPoint::new(
            ts,
            price_at(quote.map(|block| &block.open)),
            price_at(quote.map(|block| &block.high)),
            price_at(quote.map(|block| &block.low)),
            price_at(quote.map(|block| &block.close)),
        )
        .map_err(|error| FetchFailure::normalization(error.to_string()))?;

        points.push(point);
    }

    Ok(points)
}

fn decode_stooq(rows: &[crate::provider::StooqRow]) -> Result<Vec<OhlcPoint>, FetchFailure> {
    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        let ts = MarketDate::parse(&row.date)
            .map_err(|error| FetchFailure::parse(error.to_string()))?;

        let point = OhlcPoint::new(
            ts,
            parse_price(row.open.as_deref())?,
            parse_price(row.high.as_deref())?,
            parse_price(row.low.as_deref())?,
            parse_price(row.close.as_deref())?,
        )
        .map_err(|error| FetchFailure::normalization(error.to_string()))?;

        points.push(point);
    }

    Ok(points)
}

/// Coerce a provider price cell to the canonical missing-field form.
/// Non-finite values are null markers, not data.
fn coerce_price(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Parse a textual price cell; empty cells and `N/D` mark missing data.
fn parse_price(cell: Option<&str>) -> Result<Option<f64>, FetchFailure> {
    let Some(raw) = cell.map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() || raw.eq_ignore_ascii_case("n/d") {
        return Ok(None);
    }

    let value: f64 = raw
        .replace(',', "")
        .parse()
        .map_err(|_| FetchFailure::parse(format!("unreadable price cell '{raw}'")))?;

    Ok(coerce_price(value))
}

/// Convert one source's raw news payload into canonical items and
/// associate asset symbols.
pub fn normalize_news(
    outcome: FetchOutcome<RawNewsBatch>,
    source: &SourceSpec,
    assets: &[AssetSpec],
) -> FetchOutcome<Vec<NewsItem>> {
    outcome.and_then(|raw| {
        let drafts: Vec<ItemDraft> = match raw {
            RawNewsBatch::Gdelt(articles) => articles
                .into_iter()
                .map(|article| ItemDraft {
                    headline: article.title,
                    summary: String::new(),
                    published: article.seendate.as_deref().and_then(parse_compact_timestamp),
                    link: Some(article.url),
                })
                .collect(),
            RawNewsBatch::Yahoo(stories) => stories
                .into_iter()
                .map(|story| ItemDraft {
                    headline: story.title,
                    summary: String::new(),
                    published: story
                        .provider_publish_time
                        .and_then(|epoch| UtcDateTime::from_unix_timestamp(epoch).ok()),
                    link: story.link,
                })
                .collect(),
        };

        let mut items = Vec::new();
        for draft in drafts {
            if draft.headline.trim().is_empty() {
                continue;
            }

            let symbols = match &source.coverage {
                SourceCoverage::Symbols(symbols) => symbols.clone(),
                SourceCoverage::All => match_assets(&draft, assets),
            };

            // Wildcard sources only keep items that mention a configured
            // asset; nothing relevant is a valid empty result.
            if symbols.is_empty() && matches!(source.coverage, SourceCoverage::All) {
                continue;
            }

            let item = NewsItem::new(
                source.name.clone(),
                clip_chars(draft.headline, MAX_HEADLINE_CHARS),
                clip_chars(draft.summary, MAX_SUMMARY_CHARS),
                draft.published,
                symbols,
                draft.link,
            )
            .map_err(|error| FetchFailure::normalization(error.to_string()))?;

            items.push(item);
            if items.len() >= source.max_items {
                break;
            }
        }

        Ok(items)
    })
}

struct ItemDraft {
    headline: String,
    summary: String,
    published: Option<UtcDateTime>,
    link: Option<String>,
}

fn match_assets(draft: &ItemDraft, assets: &[AssetSpec]) -> Vec<Symbol> {
    let haystack = format!("{} {}", draft.headline, draft.summary).to_ascii_lowercase();
    assets
        .iter()
        .filter(|asset| {
            haystack.contains(&asset.symbol.as_str().to_ascii_lowercase())
                || haystack.contains(&asset.name.to_ascii_lowercase())
        })
        .map(|asset| asset.symbol.clone())
        .collect()
}

/// Parse GDELT's compact `YYYYMMDDTHHMMSSZ` form; unreadable values lose
/// the optional published field rather than failing the batch.
fn parse_compact_timestamp(input: &str) -> Option<UtcDateTime> {
    let compact = input.trim();
    let digits: String = compact.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 14 {
        return None;
    }

    let rfc3339 = format!(
        "{}-{}-{}T{}:{}:{}Z",
        &digits[0..4],
        &digits[4..6],
        &digits[6..8],
        &digits[8..10],
        &digits[10..12],
        &digits[12..14],
    );
    UtcDateTime::parse(&rfc3339).ok()
}

fn clip_chars(text: String, max: usize) -> String {
    if text.chars().count() <= max {
        return text;
    }
    text.chars().take(max).collect()
}
