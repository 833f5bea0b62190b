use anyhow::Context;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Returned in place of headlines when the search yields nothing usable.
pub const NO_NEWS_PLACEHOLDER: &str = "No recent news found.";

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    /// The news API answered with a non-200 status.
    #[error("news API returned status {status}: {body}")]
    Upstream { status: u16, body: String },
    /// The request never produced a usable response (connect, timeout, bad JSON).
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Source of recent headlines for a topic
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    /// Newline-joined headlines for `topic`, or [`NO_NEWS_PLACEHOLDER`].
    async fn fetch_news(&self, topic: &str) -> Result<String, NewsError>;
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    news: Vec<NewsArticle>,
}

#[derive(Debug, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: Option<String>,
}

/// Collapse the first `max` articles into a newline-joined list of trimmed titles.
///
/// A title only has to be non-empty to be kept; a blank one still contributes an
/// (empty) line once trimmed.
pub fn summarize_headlines(articles: &[NewsArticle], max: usize) -> String {
    let titles: Vec<&str> = articles
        .iter()
        .take(max)
        .filter_map(|a| a.title.as_deref())
        .filter(|t| !t.is_empty())
        .map(str::trim)
        .collect();

    if titles.is_empty() {
        NO_NEWS_PLACEHOLDER.to_string()
    } else {
        titles.join("\n")
    }
}

/// Client for the Currents latest-news endpoint.
pub struct CurrentsNewsClient {
    api_url: String,
    api_key: String,
    language: String,
    max_headlines: usize,
    client: Client,
}

impl CurrentsNewsClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("postwriter/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            language: common::DEFAULT_NEWS_LANGUAGE.to_string(),
            max_headlines: common::MAX_HEADLINES,
            client,
        })
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Never more than [`common::MAX_HEADLINES`].
    pub fn with_max_headlines(mut self, max_headlines: usize) -> Self {
        self.max_headlines = max_headlines.min(common::MAX_HEADLINES);
        self
    }
}

#[async_trait::async_trait]
impl NewsSource for CurrentsNewsClient {
    async fn fetch_news(&self, topic: &str) -> Result<String, NewsError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("language", self.language.as_str()),
                ("keywords", topic),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("news HTTP request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read news response body")?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "news API returned an error");
            return Err(NewsError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: NewsResponse = serde_json::from_str(&body)
            .with_context(|| format!("failed to parse news response: {}", body))?;
        debug!(articles = parsed.news.len(), "news API returned articles");

        Ok(summarize_headlines(&parsed.news, self.max_headlines))
    }
}
