//! Cloud file browser API handlers.
//!
//! Navigation state lives server-side in the breadcrumb stack; every
//! response carries the stack plus the current folder's listing. Selecting
//! a plain file is not navigation — the frontend opens
//! `/api/proxy/download/{file_id}` in a new browsing context instead.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use magnetcloud_core::{Breadcrumb, CloudFile, FileBrowser};

use super::cloud::map_cloud_error;
use super::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EnterRequest {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub path: Vec<Breadcrumb>,
    pub files: Vec<CloudFile>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn browser_or_unavailable(state: &AppState) -> Result<&Arc<FileBrowser>, ApiError> {
    state.browser().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(
                "Cloud backend not authenticated. Check configuration",
            )),
        )
    })
}

async fn respond(
    browser: &FileBrowser,
    listing: Result<Vec<CloudFile>, magnetcloud_core::CloudError>,
) -> Result<Json<BrowseResponse>, ApiError> {
    match listing {
        Ok(files) => Ok(Json(BrowseResponse {
            path: browser.path().await,
            files,
        })),
        Err(e) => {
            warn!(error = %e, "Folder navigation failed");
            Err(map_cloud_error(e))
        }
    }
}

/// GET /api/browse
pub async fn current(State(state): State<Arc<AppState>>) -> Result<Json<BrowseResponse>, ApiError> {
    let browser = browser_or_unavailable(&state)?;
    let listing = browser.list_current().await;
    respond(browser, listing).await
}

/// POST /api/browse/enter
pub async fn enter(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EnterRequest>,
) -> Result<Json<BrowseResponse>, ApiError> {
    let browser = browser_or_unavailable(&state)?;
    let listing = browser.enter(&body.id, &body.name).await;
    respond(browser, listing).await
}

/// POST /api/browse/up
pub async fn up(State(state): State<Arc<AppState>>) -> Result<Json<BrowseResponse>, ApiError> {
    let browser = browser_or_unavailable(&state)?;
    let listing = browser.up().await;
    respond(browser, listing).await
}

/// POST /api/browse/root
pub async fn to_root(State(state): State<Arc<AppState>>) -> Result<Json<BrowseResponse>, ApiError> {
    let browser = browser_or_unavailable(&state)?;
    let listing = browser.to_root().await;
    respond(browser, listing).await
}
