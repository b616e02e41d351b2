use crate::api::models::AppState;
use crate::api::submission::handlers::{list_submissions_handler, submit_handler};
use axum::{
    routing::{get, post},
    Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/submit", post(submit_handler))
        .route("/api/submissions", get(list_submissions_handler))
}
