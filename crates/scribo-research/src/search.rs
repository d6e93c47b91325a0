//! External source search via the Google Custom Search REST API.
//!
//! Soft-fail contract: a transport or API failure yields an empty source
//! list plus a diagnostic string, never an error to the caller. Zero
//! sources is a valid (if low-quality) outcome.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use scribo_models::Source;

use crate::error::{ResearchError, ResearchResult};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// The underlying search API caps results at 10 per request.
pub const MAX_RESULTS_PER_REQUEST: u32 = 10;

/// Outcome of a source search. `diagnostic` is set when the search
/// degraded (transport failure, API error); `sources` is then empty.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub sources: Vec<Source>,
    pub diagnostic: Option<String>,
}

/// Google Custom Search client.
pub struct SearchClient {
    api_key: String,
    engine_id: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

impl SearchClient {
    /// Create a client from `CUSTOM_SEARCH_API_KEY` and
    /// `SEARCH_ENGINE_ID` environment variables.
    pub fn from_env() -> ResearchResult<Self> {
        let api_key = std::env::var("CUSTOM_SEARCH_API_KEY")
            .map_err(|_| ResearchError::config("CUSTOM_SEARCH_API_KEY not set"))?;
        let engine_id = std::env::var("SEARCH_ENGINE_ID")
            .map_err(|_| ResearchError::config("SEARCH_ENGINE_ID not set"))?;
        Ok(Self::new(api_key, engine_id))
    }

    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Override the API base URL (used by tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search for candidate reference URLs for a topic.
    ///
    /// PDFs are excluded up front since the extractor cannot read them.
    pub async fn search(&self, query: &str, num_results: u32) -> SearchOutcome {
        let num = num_results.clamp(1, MAX_RESULTS_PER_REQUEST);
        info!(query, num, "Searching for sources");

        let result = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", &format!("{} -filetype:pdf", query)),
                ("num", &num.to_string()),
            ])
            .send()
            .await;

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Source search request failed");
                return SearchOutcome {
                    sources: vec![],
                    diagnostic: Some(format!("Failed to fetch search results: {}", e)),
                };
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Source search returned error status");
            return SearchOutcome {
                sources: vec![],
                diagnostic: Some(format!("Search API returned status {}", status)),
            };
        }

        let parsed: SearchResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Source search response unparseable");
                return SearchOutcome {
                    sources: vec![],
                    diagnostic: Some(format!("Invalid search API response: {}", e)),
                };
            }
        };

        let sources: Vec<Source> = parsed
            .items
            .into_iter()
            .map(|item| Source {
                title: item.title,
                link: item.link,
                snippet: item.snippet,
            })
            .collect();

        info!(found = sources.len(), "Source search completed");
        SearchOutcome {
            sources,
            diagnostic: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_maps_items_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"title": "A", "link": "https://a.test", "snippet": "first"},
                    {"title": "B", "link": "https://b.test", "snippet": "second"}
                ]
            })))
            .mount(&server)
            .await;

        let client = SearchClient::new("key", "cx").with_base_url(server.uri());
        let outcome = client.search("urban beekeeping benefits", 9).await;

        assert!(outcome.diagnostic.is_none());
        assert_eq!(outcome.sources.len(), 2);
        assert_eq!(outcome.sources[0].link, "https://a.test");
        assert_eq!(outcome.sources[1].title, "B");
    }

    #[tokio::test]
    async fn test_query_excludes_pdfs_and_caps_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "bees -filetype:pdf"))
            .and(query_param("num", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = SearchClient::new("key", "cx").with_base_url(server.uri());
        let outcome = client.search("bees", 25).await;
        assert!(outcome.sources.is_empty());
        assert!(outcome.diagnostic.is_none());
    }

    #[tokio::test]
    async fn test_api_error_soft_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = SearchClient::new("key", "cx").with_base_url(server.uri());
        let outcome = client.search("bees", 5).await;

        assert!(outcome.sources.is_empty());
        assert!(outcome.diagnostic.unwrap().contains("403"));
    }

    #[tokio::test]
    async fn test_transport_error_soft_fails() {
        // Nothing listening on this port
        let client = SearchClient::new("key", "cx").with_base_url("http://127.0.0.1:1");
        let outcome = client.search("bees", 5).await;
        assert!(outcome.sources.is_empty());
        assert!(outcome.diagnostic.is_some());
    }
}
