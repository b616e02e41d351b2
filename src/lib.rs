pub mod api;
pub mod config;
pub mod generation;
pub mod llm;
pub mod storage;

use crate::api::{panic_response, status_handler, AppState};
use axum::{routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

/// Build the HTTP router with every route and middleware layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status_handler))
        .merge(api::submission::routes())
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
