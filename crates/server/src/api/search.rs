//! Search API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use magnetcloud_core::{
    PageView, SearchError, SearchQuery, SessionEvent, SortField, TorrentResult,
};

use super::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Wire shape matches the aggregation backend's: `{ "Results": [...] }`.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(rename = "Results")]
    pub results: Vec<TorrentResult>,
}

#[derive(Debug, Deserialize)]
pub struct ResultsParams {
    #[serde(default)]
    pub sort: Option<SortField>,
    #[serde(default)]
    pub page: Option<usize>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/search?q=...&category=...
///
/// Query the search backend, load the result set into the session (seeders
/// descending, computed at fetch time), and return the full ordered set.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query_text = params.q.unwrap_or_default();
    if query_text.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No query provided")),
        ));
    }

    let searcher = state.searcher().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Search backend not configured")),
        )
    })?;

    // Sequence number allocated before the request goes out; a response
    // carrying an older number than the newest applied one is discarded,
    // so a slow earlier search can never clobber a later one.
    let seq = state.session().write().await.begin_search();

    let mut query = SearchQuery::new(query_text.clone());
    if let Some(category) = params.category.filter(|c| !c.is_empty()) {
        query = query.with_category(category);
    }

    match searcher.search(&query).await {
        Ok(results) => {
            let mut session = state.session().write().await;
            session.apply(SessionEvent::ResultsLoaded {
                seq,
                query: query_text,
                results,
            });
            Ok(Json(SearchResponse {
                results: session.all_results().to_vec(),
            }))
        }
        Err(e) => {
            warn!(error = %e, "Search failed");
            Err(map_search_error(e))
        }
    }
}

/// GET /api/results?sort=...&page=...
///
/// Drive the ranking engine over the last-fetched result set: `sort`
/// toggles the sort state, `page` changes the page (clamped), and the
/// current page view comes back. No indexer round trip.
pub async fn results(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResultsParams>,
) -> Json<PageView> {
    let mut session = state.session().write().await;

    if let Some(field) = params.sort {
        session.apply(SessionEvent::SortRequested { field });
    }
    if let Some(page) = params.page {
        session.apply(SessionEvent::PageChanged { page });
    }

    Json(session.page_view())
}

/// Map a search error onto an HTTP response, forwarding remote messages
/// verbatim.
fn map_search_error(e: SearchError) -> ApiError {
    match e {
        SearchError::EmptyQuery => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No query provided")),
        ),
        SearchError::Request { message, .. } => {
            (StatusCode::BAD_GATEWAY, Json(ErrorResponse::new(message)))
        }
        e @ (SearchError::Parse(_) | SearchError::ConnectionFailed(_) | SearchError::Timeout) => {
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new(e.to_string())),
            )
        }
    }
}
