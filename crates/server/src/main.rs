use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use magnetcloud_core::{
    load_config, validate_config, CloudBackend, CloudClient, JackettSearcher, PikPakClient,
    SearchBackend, Searcher,
};

use magnetcloud_server::api::create_router;
use magnetcloud_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MAGNETCLOUD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Static dir: {:?}", config.static_dir);

    // Create searcher if configured
    let searcher: Option<Arc<dyn Searcher>> = match &config.search {
        Some(search_config) => match search_config.backend {
            SearchBackend::Jackett => {
                if let Some(jackett_config) = &search_config.jackett {
                    info!("Initializing Jackett searcher at {}", jackett_config.url);
                    Some(Arc::new(JackettSearcher::new(jackett_config.clone())))
                } else {
                    error!("Jackett backend selected but no jackett config provided");
                    None
                }
            }
        },
        None => {
            info!("No search backend configured");
            None
        }
    };

    // Create cloud client if configured, logging in eagerly so a credential
    // problem shows up at startup rather than on the first request.
    let cloud: Option<Arc<dyn CloudClient>> = match &config.cloud {
        Some(cloud_config) => match cloud_config.backend {
            CloudBackend::Pikpak => {
                if let Some(pikpak_config) = &cloud_config.pikpak {
                    info!("Logging into PikPak as {}", pikpak_config.username);
                    let client = PikPakClient::new(pikpak_config.clone());
                    match client.login().await {
                        Ok(()) => info!("PikPak authentication successful"),
                        Err(e) => {
                            // The client retries authentication lazily, so
                            // keep serving; cloud endpoints surface the error.
                            warn!("PikPak login failed: {}", e);
                        }
                    }
                    Some(Arc::new(client))
                } else {
                    error!("PikPak backend selected but no pikpak config provided");
                    None
                }
            }
        },
        None => {
            info!("No cloud backend configured");
            None
        }
    };

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), searcher, cloud));

    // Create router
    let app = create_router(Arc::clone(&state));

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    // Tear down the transfer monitor so no poll timer outlives the server
    info!("Server shutting down...");
    if let Some(monitor) = state.monitor() {
        monitor.stop();
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
