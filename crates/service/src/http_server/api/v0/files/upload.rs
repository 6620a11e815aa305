use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use cubby_store::UploadError;

use crate::http_server::auth::CallerIdentity;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Name the blob was stored under, distinct from the client's filename
    pub stored_name: String,
    pub size: usize,
}

pub async fn handler(
    State(state): State<ServiceState>,
    CallerIdentity(identity): CallerIdentity,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, UploadApiError> {
    let mut upload: Option<(String, Bytes)> = None;

    // Parse multipart form data; the first "file" field wins
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadApiError::Multipart(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" if upload.is_none() => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| UploadApiError::Multipart(e.to_string()))?;

                upload = Some((filename, data));
            }
            _ => {}
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| UploadApiError::InvalidRequest("a file field is required".into()))?;
    let size = data.len();

    tracing::info!(identity = %identity, filename = %filename, size, "upload received");

    let stored_name = state.uploads().commit(&identity, &filename, data).await?;

    Ok((
        http::StatusCode::OK,
        Json(UploadResponse { stored_name, size }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum UploadApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Multipart error: {0}")]
    Multipart(String),
    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl IntoResponse for UploadApiError {
    fn into_response(self) -> Response {
        match self {
            UploadApiError::InvalidRequest(msg) | UploadApiError::Multipart(msg) => (
                http::StatusCode::BAD_REQUEST,
                format!("Bad request: {}", msg),
            )
                .into_response(),
            UploadApiError::Upload(UploadError::PayloadTooLarge { size, limit }) => (
                http::StatusCode::PAYLOAD_TOO_LARGE,
                format!("Payload of {} bytes exceeds the {} byte limit", size, limit),
            )
                .into_response(),
            UploadApiError::Upload(UploadError::Store(_)) => (
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error".to_string(),
            )
                .into_response(),
        }
    }
}
