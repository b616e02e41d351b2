pub mod models;
pub mod submission;

// Re-exports
pub use models::*;

// Status handler (simple, keep here)
use axum::{extract::State, Json};

pub const ENDPOINTS: [&str; 3] = ["GET /", "POST /api/submit", "GET /api/submissions"];

pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Review feedback API is running".to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        total_submissions: state.submissions.len().await,
    })
}
