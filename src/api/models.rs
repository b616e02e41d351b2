use crate::generation::FeedbackGenerator;
use crate::llm::LlmError;
use crate::storage::{Submission, SubmissionLog, SubmissionStats};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub generator: FeedbackGenerator,
    pub submissions: Arc<SubmissionLog>,
}

/// Request to submit a rating and review
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub review: Option<String>,
}

/// A submit request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub rating: u8,
    pub review: String,
}

/// Response after a successful submission
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub submission_id: String,
}

/// All stored submissions plus aggregates
#[derive(Debug, Serialize)]
pub struct SubmissionsResponse {
    pub submissions: Vec<Submission>,
    pub stats: SubmissionStats,
}

/// Service info response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub endpoints: Vec<String>,
    pub total_submissions: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmitRequest {
    /// Validate the request
    pub fn validate(self) -> Result<ValidSubmission, String> {
        let rating = self
            .rating
            .as_ref()
            .and_then(parse_rating)
            .ok_or_else(|| "Rating must be between 1 and 5".to_string())?;

        Ok(ValidSubmission {
            rating,
            review: self.review.unwrap_or_default().trim().to_string(),
        })
    }
}

/// Accept whole JSON numbers in 1..=5 (so `4.0` is fine, `4.5` is not).
fn parse_rating(value: &Value) -> Option<u8> {
    let Value::Number(number) = value else {
        return None;
    };
    let rating = match number.as_i64() {
        Some(n) => n,
        None => {
            let f = number.as_f64()?;
            if f.fract() != 0.0 {
                return None;
            }
            f as i64
        }
    };
    if (1..=5).contains(&rating) {
        Some(rating as u8)
    } else {
        None
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Generation(String),
    Internal(String),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Generation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: msg,
                    message: None,
                },
            ),
            AppError::Generation(msg) => {
                error!("Generation failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Failed to process submission".to_string(),
                        message: Some(msg),
                    },
                )
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal server error".to_string(),
                        message: Some(msg),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Turns a handler panic into a 500 JSON body instead of a dropped connection.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    };
    AppError::Internal(message).into_response()
}
