use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;

use crate::ServiceState;

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
}

/// Ready when the storage root is still present and a directory.
#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Response {
    match tokio::fs::metadata(state.store().root()).await {
        Ok(meta) if meta.is_dir() => {
            (StatusCode::OK, Json(ReadinessResponse { status: "ok" })).into_response()
        }
        _ => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "unavailable",
            }),
        )
            .into_response(),
    }
}
