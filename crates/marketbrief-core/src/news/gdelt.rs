//! GDELT DOC 2.0 article search.

use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest};
use crate::FetchFailure;

const SEARCH_BASE: &str = "https://api.gdeltproject.org/api/v2/doc/doc";

/// Query the article list endpoint for the most recent matches.
pub async fn fetch(
    http: &Arc<dyn HttpClient>,
    query: &str,
    max_items: usize,
) -> Result<Vec<GdeltArticle>, FetchFailure> {
    let endpoint = format!(
        "{SEARCH_BASE}?query={}&mode=ArtList&format=json&maxrecords={}&sort=DateDesc",
        urlencoding::encode(query),
        max_items,
    );

    let response = http
        .execute(HttpRequest::get(endpoint))
        .await
        .map_err(|error| FetchFailure::transport(format!("gdelt transport error: {error}")))?;

    if !response.is_success() {
        return Err(FetchFailure::transport(format!(
            "gdelt returned status {}",
            response.status,
        )));
    }

    // GDELT reports query problems as plain text with a 200 status.
    let body = response.body.trim();
    if !body.starts_with('{') {
        return Err(FetchFailure::parse(format!(
            "gdelt rejected the query: {}",
            body.chars().take(120).collect::<String>(),
        )));
    }

    let parsed: GdeltResponse = serde_json::from_str(body)
        .map_err(|error| FetchFailure::parse(format!("failed to decode gdelt response: {error}")))?;

    Ok(parsed.articles)
}

#[derive(Debug, Clone, Deserialize)]
struct GdeltResponse {
    #[serde(default)]
    articles: Vec<GdeltArticle>,
}

/// One article as returned by the DOC API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GdeltArticle {
    pub url: String,
    pub title: String,
    /// `YYYYMMDDTHHMMSSZ` compact timestamp.
    #[serde(default)]
    pub seendate: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}
