//! Direct-download passthrough.
//!
//! Resolves the cloud file's content link and streams the body through,
//! so the operator's browser never talks to the cloud CDN directly.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use tracing::warn;

use magnetcloud_core::CloudError;

use super::cloud::{cloud_or_unavailable, map_cloud_error};
use super::ErrorResponse;
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// GET /api/proxy/download/{file_id}
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Response, ApiError> {
    let cloud = cloud_or_unavailable(&state)?;

    let resolved = cloud.download_url(&file_id).await.map_err(|e| {
        warn!(error = %e, file_id = %file_id, "Download link resolution failed");
        match e {
            CloudError::Api { status: 404, message } => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new(message)))
            }
            e => map_cloud_error(e),
        }
    })?;

    // No total timeout: large files stream for longer than any sane cap.
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
        })?;

    let upstream = client.get(&resolved.url).send().await.map_err(|e| {
        warn!(error = %e, "Upstream download fetch failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(e.to_string())),
        )
    })?;

    if !upstream.status().is_success() {
        return Err((
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(format!(
                "Upstream returned HTTP {}",
                upstream.status()
            ))),
        ));
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let disposition = format!(
        "attachment; filename=\"{}\"",
        resolved.name.replace('"', "_")
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
        })
}
