//! Yahoo Finance search-news endpoint.

use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest};
use crate::FetchFailure;

const SEARCH_BASE: &str = "https://query1.finance.yahoo.com/v1/finance/search";

/// Query the search endpoint for recent news stories.
pub async fn fetch(
    http: &Arc<dyn HttpClient>,
    query: &str,
    max_items: usize,
) -> Result<Vec<YahooNewsStory>, FetchFailure> {
    let endpoint = format!(
        "{SEARCH_BASE}?q={}&newsCount={}&quotesCount=0",
        urlencoding::encode(query),
        max_items,
    );

    let request = HttpRequest::get(endpoint).with_header("referer", "https://finance.yahoo.com/");

    let response = http
        .execute(request)
        .await
        .map_err(|error| FetchFailure::transport(format!("yahoo news transport error: {error}")))?;

    if !response.is_success() {
        return Err(FetchFailure::transport(format!(
            "yahoo news returned status {}",
            response.status,
        )));
    }

    let parsed: YahooSearchResponse = serde_json::from_str(&response.body).map_err(|error| {
        FetchFailure::parse(format!("failed to decode yahoo news response: {error}"))
    })?;

    Ok(parsed.news.into_iter().take(max_items).collect())
}

#[derive(Debug, Clone, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    news: Vec<YahooNewsStory>,
}

/// One story as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct YahooNewsStory {
    pub title: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Epoch seconds.
    #[serde(default, rename = "providerPublishTime")]
    pub provider_publish_time: Option<i64>,
}
