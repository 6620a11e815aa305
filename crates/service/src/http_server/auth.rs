//! Access-gate boundary.
//!
//! Authentication itself (sessions, password checks) lives in front of this
//! service; the gate reports the authenticated identity in a request header.
//! This extractor is the only place an [`Identity`] is constructed - every
//! handler receives it explicitly and passes it into the store, so no core
//! code ever reads an ambient "current user".

use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use http::StatusCode;

use cubby_store::Identity;

/// Header the authenticating front end sets on successful login.
pub const IDENTITY_HEADER: &str = "x-forwarded-user";

/// The verified identity of the caller, required by every file operation.
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub Identity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match identity {
            Some(identity) => Ok(Self(Identity::new(identity))),
            None => Err(AuthError::Unauthorized),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no authenticated identity presented")]
    Unauthorized,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}
