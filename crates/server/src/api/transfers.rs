//! Transfer-monitoring API handlers.
//!
//! Opening the transfers view starts the polling loop; closing it stops the
//! loop deterministically. The snapshot endpoint never talks to the cloud
//! directly — it reads whatever the monitor last fetched.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use magnetcloud_core::{CloudTask, TransferMonitor};

use super::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WatchResponse {
    pub watching: bool,
}

#[derive(Debug, Serialize)]
pub struct TransfersResponse {
    pub watching: bool,
    pub tasks: Vec<CloudTask>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn monitor_or_unavailable(state: &AppState) -> Result<&Arc<TransferMonitor>, ApiError> {
    state.monitor().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(
                "Cloud backend not authenticated. Check configuration",
            )),
        )
    })
}

/// POST /api/transfers/watch
pub async fn watch_start(State(state): State<Arc<AppState>>) -> Result<Json<WatchResponse>, ApiError> {
    let monitor = monitor_or_unavailable(&state)?;
    monitor.start();
    Ok(Json(WatchResponse { watching: true }))
}

/// DELETE /api/transfers/watch
pub async fn watch_stop(State(state): State<Arc<AppState>>) -> Result<Json<WatchResponse>, ApiError> {
    let monitor = monitor_or_unavailable(&state)?;
    monitor.stop();
    Ok(Json(WatchResponse { watching: false }))
}

/// GET /api/transfers
pub async fn get_transfers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TransfersResponse>, ApiError> {
    let monitor = monitor_or_unavailable(&state)?;
    Ok(Json(TransfersResponse {
        watching: monitor.is_running(),
        tasks: monitor.snapshot().await,
    }))
}
