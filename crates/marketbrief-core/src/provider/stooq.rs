//! Stooq daily-history CSV provider.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::AssetSpec;
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{MarketDataProvider, ProviderId, RawSeries};
use crate::FetchFailure;

const DOWNLOAD_BASE: &str = "https://stooq.com/q/d/l/";

/// Daily history via Stooq's CSV download endpoint.
pub struct StooqProvider {
    http: Arc<dyn HttpClient>,
}

impl StooqProvider {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    fn endpoint(&self, asset: &AssetSpec) -> String {
        format!(
            "{DOWNLOAD_BASE}?s={}&i=d",
            urlencoding::encode(&asset.provider_symbol.to_ascii_lowercase()),
        )
    }

    async fn fetch(&self, asset: &AssetSpec) -> Result<RawSeries, FetchFailure> {
        let request = HttpRequest::get(self.endpoint(asset));

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| FetchFailure::transport(format!("stooq transport error: {error}")))?;

        if !response.is_success() {
            return Err(FetchFailure::transport(format!(
                "stooq returned status {} for '{}'",
                response.status, asset.provider_symbol,
            )));
        }

        let body = response.body.trim();
        // Stooq answers unknown symbols with a plain-text marker instead of
        // an error status.
        if body.eq_ignore_ascii_case("no data") || body.eq_ignore_ascii_case("brak danych") {
            return Err(FetchFailure::not_found(format!(
                "stooq has no data for '{}'",
                asset.provider_symbol,
            )));
        }

        if !body.starts_with("Date,") {
            return Err(FetchFailure::parse(format!(
                "stooq response for '{}' is not a daily-history CSV",
                asset.provider_symbol,
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes());

        let mut rows = Vec::new();
        for (index, record) in reader.deserialize::<StooqRow>().enumerate() {
            let row = record.map_err(|error| {
                FetchFailure::parse(format!(
                    "stooq CSV row {} for '{}' is malformed: {error}",
                    index + 1,
                    asset.provider_symbol,
                ))
            })?;
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(FetchFailure::empty(format!(
                "stooq returned zero rows for '{}'",
                asset.provider_symbol,
            )));
        }

        tracing::debug!(symbol = %asset.symbol, rows = rows.len(), "stooq history fetched");

        Ok(RawSeries::Stooq(rows))
    }
}

impl MarketDataProvider for StooqProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Stooq
    }

    fn fetch_history<'a>(
        &'a self,
        asset: &'a AssetSpec,
    ) -> Pin<Box<dyn Future<Output = Result<RawSeries, FetchFailure>> + Send + 'a>> {
        Box::pin(self.fetch(asset))
    }
}

/// One raw CSV row. Prices stay as text: Stooq marks gaps with empty
/// fields or `N/D`, which the normalizer coerces to missing values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StooqRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open")]
    pub open: Option<String>,
    #[serde(rename = "High")]
    pub high: Option<String>,
    #[serde(rename = "Low")]
    pub low: Option<String>,
    #[serde(rename = "Close")]
    pub close: Option<String>,
    #[serde(rename = "Volume", default)]
    pub volume: Option<String>,
}
