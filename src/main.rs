// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::command_dispatcher::CommandDispatcher;
use crate::application::connection_manager::ConnectionManager;
use crate::application::dashboard_service::DashboardService;
use crate::application::snapshot_store::SnapshotStore;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_command_client::HttpCommandClient;
use crate::infrastructure::websocket_link::WebSocketLink;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    command, connection, dashboard_page, fragment, health_check, snapshot,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Snapshot store: the connection manager is the only writer
    let store = SnapshotStore::new();
    let reader = store.reader();

    // Streaming link (infrastructure layer)
    let link = Arc::new(WebSocketLink::new(config.upstream.stream_url.clone()));
    let connection_handle =
        ConnectionManager::new(link, store, config.upstream.reconnect_delay()).spawn();

    // Command backend
    let transport = Arc::new(HttpCommandClient::new(
        config.upstream.command_base_url.clone(),
        config.upstream.command_timeout(),
    )?);

    // Create application state
    let state = Arc::new(AppState {
        snapshot: reader.clone(),
        connection: connection_handle.status(),
        dashboard_service: DashboardService::new(),
        commands: CommandDispatcher::new(transport, reader),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/", get(dashboard_page))
        .route("/healthz", get(health_check))
        .route("/api/snapshot", get(snapshot))
        .route("/api/connection", get(connection))
        .route("/fragments/:name", get(fragment))
        .route("/commands/:action", post(command))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server.listen_addr;
    tracing::info!(
        "Starting glucodose dashboard on {} (telemetry from {})",
        addr,
        config.upstream.stream_url
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Dashboard unmounted: no reconnects, no open link
    connection_handle.teardown().await;
    tracing::info!("Dashboard stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
