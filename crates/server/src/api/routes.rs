use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::{browse, cloud, handlers, middleware as mw, proxy, search, transfers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.static_dir().to_path_buf();

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Search and the ranking engine over the last result set
        .route("/search", get(search::search))
        .route("/results", get(search::results))
        // Cloud account
        .route("/user", get(cloud::get_user))
        .route("/download", post(cloud::add_download))
        .route("/tasks", get(cloud::get_tasks))
        .route("/files", get(cloud::get_files))
        // Transfer monitor lifecycle
        .route("/transfers", get(transfers::get_transfers))
        .route("/transfers/watch", post(transfers::watch_start))
        .route("/transfers/watch", delete(transfers::watch_stop))
        // File browser navigation
        .route("/browse", get(browse::current))
        .route("/browse/enter", post(browse::enter))
        .route("/browse/up", post(browse::up))
        .route("/browse/root", post(browse::to_root))
        // Download passthrough
        .route("/proxy/download/{file_id}", get(proxy::download))
        .with_state(state);

    // Serve the frontend with SPA fallback
    let index_path = static_dir.join("index.html");
    let serve_dir = ServeDir::new(&static_dir).fallback(ServeFile::new(index_path));

    Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(handlers::prometheus_metrics))
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(mw::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
