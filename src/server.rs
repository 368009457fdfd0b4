//! Server initialization and routing.
//!
//! Builds the axum router, wires the middleware stack (trace, request ID,
//! access log, timeout, CORS), and runs the listener with graceful
//! shutdown on SIGTERM / Ctrl+C.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::middleware::{access_log, request_id};
use crate::routes::{api_info, health, not_found, search};
use crate::state::ServerState;

/// Permissive CORS for the configured frontend.
///
/// `*` allows any origin; anything else is taken as the one exact origin
/// the frontend is served from. Methods mirror what the frontend issues:
/// GET, POST, OPTIONS.
fn cors_layer(frontend_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = if frontend_origin == "*" {
        AllowOrigin::any()
    } else {
        AllowOrigin::exact(frontend_origin.parse::<HeaderValue>()?)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any))
}

/// Build the axum router with all routes and middleware.
///
/// Exposed so integration tests can drive the full stack without binding
/// a socket.
pub fn build_router(state: Arc<ServerState>) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.frontend_origin)?;
    let timeout = TimeoutLayer::new(state.config.timeout());

    Ok(Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/admin/version", get(health::version))
        .route("/search", get(search::search))
        .fallback(not_found)
        .layer(timeout)
        .layer(cors)
        .layer(from_fn(access_log))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the HTTP service.
///
/// Initializes logging, loads every configured registry extract into the
/// in-memory index (fatal on any extract failure), then serves until
/// SIGTERM or Ctrl+C.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_target(false)
        .init();

    let state = Arc::new(ServerState::new(config.clone())?);
    let app = build_router(state)?;

    let addr = config.socket_addr()?;
    tracing::info!(
        app = %config.app_name,
        %addr,
        files = config.data_files.len(),
        frontend = %config.frontend_origin,
        "REST service is listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
