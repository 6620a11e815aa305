use axum::extract::DefaultBodyLimit;
use axum::Router;
use http::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use http::Method;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
mod auth;
mod handlers;
mod health;

pub use auth::{AuthError, CallerIdentity, IDENTITY_HEADER};

use crate::{Config, ServiceState};

const API_PREFIX: &str = "/api";
const STATUS_PREFIX: &str = "/_status";

/// Body limit when no upload cap is configured.
const DEFAULT_BODY_LIMIT: usize = 500 * 1024 * 1024;
/// Headroom on top of the upload cap for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Assemble the service router.
pub fn router(state: ServiceState, max_upload_bytes: Option<u64>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST, Method::DELETE])
        .allow_headers(vec![
            ACCEPT,
            ORIGIN,
            CONTENT_TYPE,
            http::HeaderName::from_static(IDENTITY_HEADER),
        ])
        .allow_origin(Any)
        .allow_credentials(false);

    let body_limit = max_upload_bytes
        .map(|cap| cap as usize + MULTIPART_OVERHEAD)
        .unwrap_or(DEFAULT_BODY_LIMIT);

    Router::new()
        .nest(STATUS_PREFIX, health::router(state.clone()))
        .nest(API_PREFIX, api::router(state.clone()))
        .fallback(handlers::not_found_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(cors_layer)
}

/// Run the HTTP server until the shutdown signal fires.
pub async fn run(
    config: Config,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let listen_addr = config.listen_addr;
    let log_level = config.log_level;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let app_router = router(state, config.max_upload_bytes).layer(trace_layer);

    tracing::info!(addr = ?listen_addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, app_router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
