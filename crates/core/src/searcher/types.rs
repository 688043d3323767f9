//! Types for the torrent search system.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query parameters for a torrent search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text search query. Must be non-empty.
    pub query: String,
    /// Optional indexer category code, passed through unmodified
    /// (opaque numeric-string taxonomy, e.g. "2000").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A single torrent search result.
///
/// Immutable once fetched; lives for the duration of one search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentResult {
    /// Unique, stable identifier within one result set.
    pub id: String,
    /// Torrent title.
    pub title: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Seeder count.
    pub seeders: u32,
    /// Peer count.
    pub peers: u32,
    /// When the torrent was published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
    /// Category label as reported by the indexer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Which indexer returned this result.
    pub indexer: String,
    /// Magnet URI. May be absent when the indexer only serves .torrent files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnet_uri: Option<String>,
    /// Direct link to the torrent page on the indexer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
}

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No query provided")]
    EmptyQuery,

    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("Failed to parse search response: {0}")]
    Parse(String),

    #[error("Search backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for torrent search backends.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Execute a search. A single failed call surfaces the error
    /// immediately; no retries.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<TorrentResult>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_serialization() {
        let query = SearchQuery::new("big buck bunny").with_category("2000");

        let json = serde_json::to_string(&query).unwrap();
        let parsed: SearchQuery = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.query, "big buck bunny");
        assert_eq!(parsed.category.as_deref(), Some("2000"));
    }

    #[test]
    fn test_search_query_minimal() {
        let json = r#"{"query": "minimal"}"#;
        let parsed: SearchQuery = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.query, "minimal");
        assert!(parsed.category.is_none());
    }

    #[test]
    fn test_request_error_displays_server_message_verbatim() {
        let err = SearchError::Request {
            status: 500,
            message: "indexer timeout".to_string(),
        };
        assert_eq!(err.to_string(), "indexer timeout");
    }

    #[test]
    fn test_torrent_result_optional_fields_skipped() {
        let result = TorrentResult {
            id: "abc".to_string(),
            title: "Test".to_string(),
            size_bytes: 1024,
            seeders: 10,
            peers: 5,
            publish_date: None,
            category: None,
            indexer: "mock".to_string(),
            magnet_uri: None,
            details_url: None,
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("magnet_uri"));
        assert!(!json.contains("publish_date"));

        let parsed: TorrentResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "abc");
        assert_eq!(parsed.seeders, 10);
    }
}
