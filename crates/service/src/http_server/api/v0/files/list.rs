use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use cubby_store::StoreError;

use crate::http_server::auth::CallerIdentity;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub files: Vec<String>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    CallerIdentity(identity): CallerIdentity,
) -> Result<impl IntoResponse, ListError> {
    let namespace = state.store().namespace_for(&identity).await?;
    let files = state.store().list(&namespace).await?;

    Ok((http::StatusCode::OK, Json(ListResponse { files })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        match self {
            ListError::Store(_) => (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error".to_string(),
            )
                .into_response(),
        }
    }
}
