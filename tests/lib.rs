//! Shared test support: a scripted HTTP transport and response fixtures.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use marketbrief_core::{HttpClient, HttpError, HttpRequest, HttpResponse};

enum Scripted {
    Respond(Result<HttpResponse, HttpError>),
    /// Never resolves; exercises per-fetch timeouts.
    Hang,
}

/// URL-routed mock transport.
///
/// Routes are matched by substring in registration order; unrouted
/// requests fail loudly so tests never silently depend on the network.
pub struct MockHttpClient {
    routes: Vec<(String, Scripted)>,
    seen: Mutex<Vec<String>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn route_ok(mut self, needle: &str, body: &str) -> Self {
        self.routes.push((
            needle.to_owned(),
            Scripted::Respond(Ok(HttpResponse::ok(body))),
        ));
        self
    }

    pub fn route_status(mut self, needle: &str, status: u16, body: &str) -> Self {
        self.routes.push((
            needle.to_owned(),
            Scripted::Respond(Ok(HttpResponse {
                status,
                body: body.to_owned(),
            })),
        ));
        self
    }

    pub fn route_error(mut self, needle: &str, message: &str) -> Self {
        self.routes.push((
            needle.to_owned(),
            Scripted::Respond(Err(HttpError::new(message))),
        ));
        self
    }

    pub fn route_hang(mut self, needle: &str) -> Self {
        self.routes.push((needle.to_owned(), Scripted::Hang));
        self
    }

    pub fn seen_urls(&self) -> Vec<String> {
        self.seen
            .lock()
            .expect("url store should not be poisoned")
            .clone()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for MockHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.seen
            .lock()
            .expect("url store should not be poisoned")
            .push(request.url.clone());

        let matched = self
            .routes
            .iter()
            .find(|(needle, _)| request.url.contains(needle.as_str()));

        match matched {
            Some((_, Scripted::Respond(response))) => {
                let response = response.clone();
                Box::pin(async move { response })
            }
            Some((_, Scripted::Hang)) => Box::pin(std::future::pending()),
            None => {
                let url = request.url;
                Box::pin(async move { Err(HttpError::new(format!("unrouted request: {url}"))) })
            }
        }
    }
}

/// Yahoo chart body with two ascending daily points.
pub fn yahoo_chart_body() -> String {
    String::from(
        r#"{
        "chart": {
            "result": [{
                "timestamp": [1704153600, 1704240000],
                "indicators": {"quote": [{
                    "open": [100.0, 101.0],
                    "high": [102.0, 103.0],
                    "low": [99.0, 100.5],
                    "close": [101.5, 102.0]
                }]}
            }],
            "error": null
        }
    }"#,
    )
}

/// Yahoo chart error body for an unknown symbol.
pub fn yahoo_not_found_body() -> String {
    String::from(
        r#"{"chart":{"result":null,"error":{
            "code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
    )
}

/// Stooq daily-history CSV with two rows.
pub fn stooq_csv_body() -> String {
    String::from(
        "Date,Open,High,Low,Close,Volume\n\
         2024-01-02,100.0,102.0,99.0,101.5,1200\n\
         2024-01-03,101.0,103.0,100.5,102.0,900\n",
    )
}

/// GDELT article list mentioning the given asset name.
pub fn gdelt_body(asset_name: &str) -> String {
    serde_json::json!({
        "articles": [
            {
                "url": "https://example.test/article-1",
                "title": format!("{asset_name} extends gains on strong demand"),
                "seendate": "20240115T134500Z",
                "domain": "example.test"
            },
            {
                "url": "https://example.test/article-2",
                "title": "Unrelated commodity shipping report",
                "seendate": "20240115T101500Z",
                "domain": "example.test"
            }
        ]
    })
    .to_string()
}

/// Chat completion following the SUMMARY/SENTIMENT contract.
pub fn completion_body(summary: &str, sentiment: &str) -> String {
    serde_json::json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": format!("SUMMARY: {summary}\nSENTIMENT: {sentiment}")
            }
        }]
    })
    .to_string()
}
