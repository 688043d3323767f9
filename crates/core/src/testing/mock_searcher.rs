//! Mock searcher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::searcher::{SearchError, SearchQuery, Searcher, TorrentResult};

/// Mock implementation of the Searcher trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search results
/// - Track executed queries for assertions
/// - Fail the next call with a scripted error
pub struct MockSearcher {
    results: Arc<RwLock<Vec<TorrentResult>>>,
    queries: Arc<RwLock<Vec<SearchQuery>>>,
    next_error: Arc<RwLock<Option<SearchError>>>,
}

impl Default for MockSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearcher {
    /// Create a new mock searcher with empty results.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the results to return for subsequent searches.
    pub async fn set_results(&self, results: Vec<TorrentResult>) {
        *self.results.write().await = results;
    }

    /// Fail the next search with the given error (consumed on use).
    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Queries executed so far.
    pub async fn recorded_queries(&self) -> Vec<SearchQuery> {
        self.queries.read().await.clone()
    }

    /// Build a minimal result for fixtures.
    pub fn result(id: &str, title: &str, seeders: u32) -> TorrentResult {
        TorrentResult {
            id: id.to_string(),
            title: title.to_string(),
            size_bytes: 0,
            seeders,
            peers: seeders,
            publish_date: None,
            category: None,
            indexer: "mock-indexer".to_string(),
            magnet_uri: Some(format!("magnet:?xt=urn:btih:{}", id)),
            details_url: None,
        }
    }
}

#[async_trait]
impl Searcher for MockSearcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<TorrentResult>, SearchError> {
        if query.query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        self.queries.write().await.push(query.clone());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self.results.read().await.clone())
    }
}
