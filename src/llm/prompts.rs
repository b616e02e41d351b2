//! Prompt templates for the three generations run per submission.

use super::GenerationRequest;

pub const FALLBACK_USER_RESPONSE: &str =
    "Thank you for your feedback! We appreciate you taking the time to share your experience.";

pub const FALLBACK_ACTIONS: &str =
    "1. Review feedback with the team\n2. Follow up with customer if needed";

/// Used when the model produces no summary.
pub fn fallback_summary(rating: u8) -> String {
    format!("Customer gave a {}-star rating.", rating)
}

pub fn user_response(rating: u8, review: &str) -> GenerationRequest {
    let tone = if rating >= 4 {
        "Be appreciative and thank them for the positive feedback."
    } else {
        "Be empathetic, apologize for any shortcomings, and show that their concerns will be addressed."
    };

    GenerationRequest {
        prompt: format!(
            "You are a friendly customer service representative. A customer left a {rating}-star rating \
             with the following review: \"{review}\"\n\n\
             Write a short, warm response (2-3 sentences) acknowledging their feedback. {tone}",
            review = review_or_placeholder(review),
        ),
        temperature: 0.7,
        max_tokens: 150,
    }
}

pub fn summary(rating: u8, review: &str) -> GenerationRequest {
    let prompt = if review.is_empty() {
        format!(
            "A customer left a {rating}-star rating without a written review. \
             Write a single sentence summarizing this feedback."
        )
    } else {
        format!(
            "Summarize the following {rating}-star customer review in 1-2 concise sentences:\n\n\"{review}\""
        )
    };

    GenerationRequest {
        prompt,
        temperature: 0.5,
        max_tokens: 100,
    }
}

pub fn recommended_actions(rating: u8, review: &str) -> GenerationRequest {
    GenerationRequest {
        prompt: format!(
            "Based on this {rating}-star customer review: \"{review}\"\n\n\
             Suggest 2-3 specific, actionable recommendations for the business. \
             Format them as a numbered list and keep each item to one sentence.",
            review = review_or_placeholder(review),
        ),
        temperature: 0.7,
        max_tokens: 200,
    }
}

fn review_or_placeholder(review: &str) -> &str {
    if review.is_empty() {
        "No written review provided"
    } else {
        review
    }
}
