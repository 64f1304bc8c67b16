//! Wikipedia (`MediaWiki` Action API) client module
//!
//! Encapsulates title search and plain-text extract retrieval.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::BotError;

const USER_AGENT: &str = concat!("wikisum/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Search and content provider consumed by the pipeline.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Titles matching `query`, best match first, at most `limit` of them.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<String>, BotError>;

    /// Full plain-text content of the article named `title`.
    async fn fetch_content(&self, title: &str) -> Result<String, BotError>;
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    error: Option<ApiError>,
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    error: Option<ApiError>,
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    missing: bool,
    extract: Option<String>,
}

/// Wikipedia API client
pub struct WikiClient {
    http: Client,
    api_url: String,
}

impl WikiClient {
    /// # Errors
    ///
    /// Returns `HttpError` if the HTTP client cannot be built.
    pub fn new(api_url: String) -> Result<Self, BotError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BotError::HttpError(format!("Failed to build Wikipedia HTTP client: {e}")))?;
        Ok(Self { http, api_url })
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<T, reqwest::Error> {
        self.http
            .get(&self.api_url)
            .query(&[("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }
}

#[async_trait]
impl ArticleSource for WikiClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<String>, BotError> {
        let limit = limit.to_string();
        let response: SearchResponse = self
            .get_json(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", &limit),
            ])
            .await
            .map_err(|e| BotError::ResolutionError(format!("Wikipedia search failed: {e}")))?;

        if let Some(err) = response.error {
            warn!(code = %err.code, "Wikipedia search returned an error");
            return Err(BotError::ResolutionError(format!(
                "Wikipedia search failed: {} ({})",
                err.info, err.code
            )));
        }

        let titles: Vec<String> = response
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default();
        debug!(query, hits = titles.len(), "Wikipedia search complete");
        Ok(titles)
    }

    async fn fetch_content(&self, title: &str) -> Result<String, BotError> {
        let response: ExtractResponse = self
            .get_json(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await
            .map_err(|e| BotError::FetchError(format!("Wikipedia request failed: {e}")))?;

        if let Some(err) = response.error {
            return Err(BotError::FetchError(format!(
                "Wikipedia returned an error: {} ({})",
                err.info, err.code
            )));
        }

        let page = response
            .query
            .and_then(|q| q.pages.into_iter().next())
            .ok_or_else(|| BotError::FetchError(format!("No page returned for '{title}'")))?;

        if page.missing {
            return Err(BotError::FetchError(format!(
                "Page '{}' does not exist",
                page.title
            )));
        }

        match page.extract {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(BotError::FetchError(format!(
                "Page '{}' has no text content",
                page.title
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parsing() {
        let json_str = r#"{"batchcomplete":true,"query":{"searchinfo":{"totalhits":2},
            "search":[{"ns":0,"title":"Turing Award","pageid":1},{"ns":0,"title":"Alan Turing","pageid":2}]}}"#;
        let resp: SearchResponse = serde_json::from_str(json_str).unwrap();
        let titles: Vec<_> = resp.query.unwrap().search.into_iter().map(|h| h.title).collect();
        assert_eq!(titles, vec!["Turing Award", "Alan Turing"]);
    }

    #[test]
    fn test_extract_response_missing_page() {
        let json_str =
            r#"{"batchcomplete":true,"query":{"pages":[{"ns":0,"title":"Zzznotreal","missing":true}]}}"#;
        let resp: ExtractResponse = serde_json::from_str(json_str).unwrap();
        let page = resp.query.unwrap().pages.into_iter().next().unwrap();
        assert!(page.missing);
        assert!(page.extract.is_none());
    }

    #[test]
    fn test_error_response_parsing() {
        let json_str = r#"{"error":{"code":"badvalue","info":"Unrecognized value"}}"#;
        let resp: SearchResponse = serde_json::from_str(json_str).unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, "badvalue");
        assert!(resp.query.is_none());
    }
}
