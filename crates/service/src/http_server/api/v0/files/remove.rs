use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use cubby_store::StoreError;

use crate::http_server::auth::CallerIdentity;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub name: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    CallerIdentity(identity): CallerIdentity,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, RemoveError> {
    let namespace = state.store().namespace_for(&identity).await?;
    state.store().delete(&namespace, &name).await?;

    tracing::info!(namespace = %namespace.name(), name = %name, "blob deleted");

    Ok((http::StatusCode::OK, Json(RemoveResponse { name })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RemoveError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for RemoveError {
    fn from(err: StoreError) -> Self {
        match err {
            // a traversal attempt answers exactly like a missing file
            StoreError::NotFound(name) | StoreError::Traversal(name) => Self::NotFound(name),
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for RemoveError {
    fn into_response(self) -> Response {
        match self {
            RemoveError::NotFound(_) => {
                (http::StatusCode::NOT_FOUND, "File not found".to_string()).into_response()
            }
            RemoveError::Store(_) => (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error".to_string(),
            )
                .into_response(),
        }
    }
}
