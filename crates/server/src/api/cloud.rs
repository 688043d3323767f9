//! Cloud account API handlers: user profile, download submission, task and
//! file listings.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use magnetcloud_core::{
    CloudClient, CloudError, CloudFile, CloudTask, TransferReceipt, UserProfile,
};

use super::middleware::ClientIp;
use super::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddDownloadRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddDownloadResponse {
    pub success: bool,
    #[serde(flatten)]
    pub receipt: TransferReceipt,
}

#[derive(Debug, Deserialize)]
pub struct FilesParams {
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<CloudTask>,
}

#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub files: Vec<CloudFile>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Get the cloud client or a 503 telling the operator to fix the config.
pub(super) fn cloud_or_unavailable(state: &AppState) -> Result<&Arc<dyn CloudClient>, ApiError> {
    state.cloud().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(
                "Cloud backend not authenticated. Check configuration",
            )),
        )
    })
}

/// Map a cloud error onto an HTTP response, forwarding the server's message
/// verbatim.
pub(super) fn map_cloud_error(e: CloudError) -> ApiError {
    match e {
        CloudError::Auth(_) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Session expired")),
        ),
        CloudError::Api { message, .. } => {
            (StatusCode::BAD_GATEWAY, Json(ErrorResponse::new(message)))
        }
        e @ (CloudError::Parse(_) | CloudError::ConnectionFailed(_) | CloudError::Timeout) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(e.to_string())),
        ),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/user
pub async fn get_user(State(state): State<Arc<AppState>>) -> Result<Json<UserProfile>, ApiError> {
    let cloud = cloud_or_unavailable(&state)?;

    match cloud.get_user().await {
        Ok(profile) => Ok(Json(profile)),
        Err(e) => {
            warn!(error = %e, "User profile fetch failed");
            Err(map_cloud_error(e))
        }
    }
}

/// POST /api/download
///
/// Submit a magnet link for offline download, rate-limited per client IP.
pub async fn add_download(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Json(body): Json<AddDownloadRequest>,
) -> Result<Json<AddDownloadResponse>, ApiError> {
    let cloud = cloud_or_unavailable(&state)?;

    if body.url.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No URL provided")),
        ));
    }

    if let Err(remaining) = state.download_cooldown().try_acquire(ip).await {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new(format!(
                "Rate limit exceeded. Please wait {}s",
                remaining.as_secs()
            ))),
        ));
    }

    match cloud.add_download(&body.url, body.name.as_deref()).await {
        Ok(receipt) => Ok(Json(AddDownloadResponse {
            success: true,
            receipt,
        })),
        Err(e) => {
            warn!(error = %e, "Download submission failed");
            Err(map_cloud_error(e))
        }
    }
}

/// GET /api/tasks
pub async fn get_tasks(State(state): State<Arc<AppState>>) -> Result<Json<TasksResponse>, ApiError> {
    let cloud = cloud_or_unavailable(&state)?;

    match cloud.get_tasks().await {
        Ok(tasks) => Ok(Json(TasksResponse { tasks })),
        Err(e) => {
            warn!(error = %e, "Task listing failed");
            Err(map_cloud_error(e))
        }
    }
}

/// GET /api/files?parent_id=...
pub async fn get_files(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilesParams>,
) -> Result<Json<FilesResponse>, ApiError> {
    let cloud = cloud_or_unavailable(&state)?;

    match cloud.get_files(params.parent_id.as_deref()).await {
        Ok(files) => Ok(Json(FilesResponse { files })),
        Err(e) => {
            warn!(error = %e, "File listing failed");
            Err(map_cloud_error(e))
        }
    }
}
