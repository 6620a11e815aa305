use axum::routing::{delete, get, post};
use axum::Router;

use crate::ServiceState;

pub mod fetch;
pub mod list;
pub mod remove;
pub mod upload;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(list::handler))
        .route("/upload", post(upload::handler))
        .route("/download/:name", get(fetch::download_handler))
        .route("/preview/:name", get(fetch::preview_handler))
        .route("/:name", delete(remove::handler))
        .with_state(state)
}
