use crate::api::models::*;
use crate::storage::Submission;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

pub async fn submit_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    // Validate
    let Json(request) =
        payload.map_err(|e| AppError::Validation(format!("Invalid request body: {}", e.body_text())))?;
    let ValidSubmission { rating, review } = request.validate().map_err(AppError::Validation)?;

    info!(rating, has_review = !review.is_empty(), "Processing submission");

    // Generate (all or nothing)
    let feedback = state.generator.generate(rating, &review).await?;

    // Store
    let submission = Submission::new(
        rating,
        review,
        feedback.user_response.clone(),
        feedback.summary,
        feedback.recommended_actions,
    );
    let submission_id = submission.id.clone();
    let evicted = state.submissions.insert(submission).await;

    info!(%submission_id, evicted, "Submission stored");

    Ok(Json(SubmitResponse {
        success: true,
        message: feedback.user_response,
        submission_id,
    }))
}

pub async fn list_submissions_handler(State(state): State<AppState>) -> Json<SubmissionsResponse> {
    let (submissions, stats) = state.submissions.snapshot_with_stats().await;

    info!(total = stats.total, "Listing submissions");

    Json(SubmissionsResponse { submissions, stats })
}
