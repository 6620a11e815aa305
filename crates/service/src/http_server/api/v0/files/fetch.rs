use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use cubby_store::{Identity, StoreError};

use crate::http_server::auth::CallerIdentity;
use crate::ServiceState;

enum Disposition {
    /// Force download
    Attachment,
    /// Display in the browser
    Inline,
}

impl Disposition {
    fn header_value(&self, name: &str) -> String {
        match self {
            Disposition::Attachment => format!("attachment; filename=\"{}\"", name),
            Disposition::Inline => format!("inline; filename=\"{}\"", name),
        }
    }
}

pub async fn download_handler(
    State(state): State<ServiceState>,
    CallerIdentity(identity): CallerIdentity,
    Path(name): Path<String>,
) -> Result<Response, FetchError> {
    serve_blob(state, identity, name, Disposition::Attachment).await
}

pub async fn preview_handler(
    State(state): State<ServiceState>,
    CallerIdentity(identity): CallerIdentity,
    Path(name): Path<String>,
) -> Result<Response, FetchError> {
    serve_blob(state, identity, name, Disposition::Inline).await
}

async fn serve_blob(
    state: ServiceState,
    identity: Identity,
    name: String,
    disposition: Disposition,
) -> Result<Response, FetchError> {
    let namespace = state.store().namespace_for(&identity).await?;
    let data = state.store().read(&namespace, &name).await?;

    // Detect MIME type from the stored name's extension
    let mime_type = mime_guess::from_path(&name).first_or_octet_stream();

    Ok((
        http::StatusCode::OK,
        [
            (axum::http::header::CONTENT_TYPE, mime_type.to_string()),
            (
                axum::http::header::CONTENT_DISPOSITION,
                disposition.header_value(&name),
            ),
        ],
        data,
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for FetchError {
    fn from(err: StoreError) -> Self {
        match err {
            // a traversal attempt answers exactly like a missing file
            StoreError::NotFound(name) | StoreError::Traversal(name) => Self::NotFound(name),
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        match self {
            FetchError::NotFound(_) => {
                (http::StatusCode::NOT_FOUND, "File not found".to_string()).into_response()
            }
            FetchError::Store(_) => (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error".to_string(),
            )
                .into_response(),
        }
    }
}
