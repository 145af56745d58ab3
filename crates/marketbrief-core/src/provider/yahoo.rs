//! Yahoo Finance chart API provider.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::AssetSpec;
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{MarketDataProvider, ProviderId, RawSeries};
use crate::FetchFailure;

const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Daily history via the unauthenticated chart endpoint.
pub struct YahooProvider {
    http: Arc<dyn HttpClient>,
    range: &'static str,
}

impl YahooProvider {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http, range: "3mo" }
    }

    fn endpoint(&self, asset: &AssetSpec) -> String {
        format!(
            "{CHART_BASE}/{}?range={}&interval=1d",
            urlencoding::encode(&asset.provider_symbol),
            self.range,
        )
    }

    async fn fetch(&self, asset: &AssetSpec) -> Result<RawSeries, FetchFailure> {
        let request = HttpRequest::get(self.endpoint(asset))
            .with_header("referer", "https://finance.yahoo.com/");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| FetchFailure::transport(format!("yahoo transport error: {error}")))?;

        // Yahoo reports unknown symbols as a structured error body, usually
        // alongside a 404 status; inspect the body before giving up on the
        // status code.
        let parsed: Result<YahooChartResponse, _> = serde_json::from_str(&response.body);

        if let Ok(ref chart) = parsed {
            if let Some(error) = &chart.chart.error {
                if error.code.eq_ignore_ascii_case("not found") {
                    return Err(FetchFailure::not_found(format!(
                        "yahoo has no data for '{}': {}",
                        asset.provider_symbol,
                        error.description.as_deref().unwrap_or("unknown symbol"),
                    )));
                }
                return Err(FetchFailure::transport(format!(
                    "yahoo chart API error '{}' for '{}'",
                    error.code, asset.provider_symbol,
                )));
            }
        }

        if !response.is_success() {
            return Err(FetchFailure::transport(format!(
                "yahoo returned status {} for '{}'",
                response.status, asset.provider_symbol,
            )));
        }

        let chart = parsed.map_err(|error| {
            FetchFailure::parse(format!("failed to decode yahoo chart response: {error}"))
        })?;

        let result = chart
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                FetchFailure::empty(format!(
                    "yahoo chart response carries no result for '{}'",
                    asset.provider_symbol,
                ))
            })?;

        if result.timestamp.as_deref().is_none_or(<[i64]>::is_empty) {
            return Err(FetchFailure::empty(format!(
                "yahoo returned zero points for '{}'",
                asset.provider_symbol,
            )));
        }

        tracing::debug!(
            symbol = %asset.symbol,
            points = result.timestamp.as_deref().map_or(0, <[i64]>::len),
            "yahoo history fetched"
        );

        Ok(RawSeries::Yahoo(result))
    }
}

impl MarketDataProvider for YahooProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn fetch_history<'a>(
        &'a self,
        asset: &'a AssetSpec,
    ) -> Pin<Box<dyn Future<Output = Result<RawSeries, FetchFailure>> + Send + 'a>> {
        Box::pin(self.fetch(asset))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartEnvelope {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

/// One chart result: parallel arrays of epoch timestamps and prices.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct YahooChartResult {
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: YahooIndicators,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct YahooIndicators {
    #[serde(default)]
    pub quote: Vec<YahooQuoteBlock>,
}

/// Parallel price arrays; `null` marks a gap in the series.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct YahooQuoteBlock {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}
