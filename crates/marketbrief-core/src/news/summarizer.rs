//! LLM-assisted news condensation.
//!
//! Speaks the OpenRouter-compatible chat-completions contract through the
//! shared [`HttpClient`] so tests can script completions. The bearer
//! credential is optional: a missing token degrades summarization to a
//! scoped failure, it never aborts the run.

use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;

use crate::config::AssetSpec;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::{FetchFailure, MarketSummary, NewsItem, Sentiment};

const COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const SYSTEM_PROMPT: &str =
    "You are an expert financial analyst. Follow the user's format precisely.";

/// Environment variable holding the bearer credential.
pub const CREDENTIAL_ENV: &str = "MARKETBRIEF_OPENROUTER_API_KEY";

/// Condenses collected news into a per-asset summary with sentiment.
pub struct Summarizer {
    http: Arc<dyn HttpClient>,
    credential: Option<String>,
    model: String,
    summary_re: Regex,
    sentiment_re: Regex,
}

impl Summarizer {
    pub fn new(http: Arc<dyn HttpClient>, credential: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            credential,
            model: model.into(),
            summary_re: Regex::new(r"(?is)SUMMARY:\s*(.*?)\s*(?:SENTIMENT:|$)")
                .expect("summary pattern must compile"),
            sentiment_re: Regex::new(r"(?i)SENTIMENT:\s*([A-Za-z]+)")
                .expect("sentiment pattern must compile"),
        }
    }

    /// Condense one asset's news items into a summary.
    ///
    /// # Errors
    ///
    /// Returns [`FetchFailure`] when the credential is absent, there is
    /// nothing to condense, the completion call fails, or the completion
    /// does not follow the SUMMARY/SENTIMENT format.
    pub async fn summarize(
        &self,
        asset: &AssetSpec,
        items: &[NewsItem],
    ) -> Result<MarketSummary, FetchFailure> {
        let credential = self.credential.as_deref().ok_or_else(|| {
            FetchFailure::missing_credential(format!(
                "{CREDENTIAL_ENV} is not set; cannot summarize news for {}",
                asset.symbol,
            ))
        })?;

        if items.is_empty() {
            return Err(FetchFailure::empty(format!(
                "no news items to condense for {}",
                asset.symbol,
            )));
        }

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": build_prompt(asset, items)},
            ],
        });

        let request = HttpRequest::post(COMPLETIONS_URL)
            .with_auth(&HttpAuth::BearerToken(credential.to_owned()))
            .with_json_body(body.to_string());

        let response = self.http.execute(request).await.map_err(|error| {
            FetchFailure::transport(format!("summarizer transport error: {error}"))
        })?;

        if !response.is_success() {
            return Err(FetchFailure::transport(format!(
                "summarizer returned status {}",
                response.status,
            )));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&response.body)
            .map_err(|error| {
                FetchFailure::parse(format!("failed to decode completion: {error}"))
            })?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.trim())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| FetchFailure::empty("completion carried no content"))?;

        self.parse_completion(asset, content)
    }

    fn parse_completion(
        &self,
        asset: &AssetSpec,
        content: &str,
    ) -> Result<MarketSummary, FetchFailure> {
        let text = self
            .summary_re
            .captures(content)
            .and_then(|captures| captures.get(1))
            .map(|capture| capture.as_str().trim().to_owned())
            .ok_or_else(|| {
                FetchFailure::parse("completion is missing the SUMMARY line")
            })?;

        let sentiment = self
            .sentiment_re
            .captures(content)
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| FetchFailure::parse("completion is missing the SENTIMENT line"))?
            .as_str()
            .parse::<Sentiment>()
            .map_err(|error| FetchFailure::parse(error.to_string()))?;

        MarketSummary::new(asset.symbol.clone(), text, sentiment)
            .map_err(|error| FetchFailure::parse(error.to_string()))
    }
}

fn build_prompt(asset: &AssetSpec, items: &[NewsItem]) -> String {
    let mut dossier = String::new();
    for (index, item) in items.iter().enumerate() {
        let body = if item.summary.trim().is_empty() {
            item.headline.as_str()
        } else {
            item.summary.as_str()
        };
        dossier.push_str(&format!(
            "--- ARTICLE {}: {} ---\n{}\n\n",
            index + 1,
            item.headline,
            body,
        ));
    }

    format!(
        "Analyze the following news articles regarding {}. Provide a 3-4 sentence \
         holistic market summary. Following the summary, on a new line, provide the \
         overall market sentiment. The sentiment must be one of: Positive, Neutral, \
         Negative, or Mixed.\n\n\
         Here is the required format:\n\
         SUMMARY: [Your summary here]\n\
         SENTIMENT: [Your sentiment here]\n\n\
         Articles Dossier: ###\n{dossier}###",
        asset.name,
    )
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}
