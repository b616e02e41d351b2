use crate::llm::{prompts, LlmError, ModelClient};
use std::sync::Arc;
use tracing::debug;

/// Text produced for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFeedback {
    pub user_response: String,
    pub summary: String,
    pub recommended_actions: String,
}

/// Runs the three per-submission generations against a model client.
#[derive(Clone)]
pub struct FeedbackGenerator {
    client: Arc<dyn ModelClient>,
}

impl FeedbackGenerator {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// All three calls run concurrently; the first error aborts the rest.
    pub async fn generate(&self, rating: u8, review: &str) -> Result<GeneratedFeedback, LlmError> {
        let (user_response, summary, recommended_actions) = tokio::try_join!(
            self.client.generate(prompts::user_response(rating, review)),
            self.client.generate(prompts::summary(rating, review)),
            self.client.generate(prompts::recommended_actions(rating, review)),
        )?;

        debug!(
            response_fallback = user_response.is_none(),
            summary_fallback = summary.is_none(),
            actions_fallback = recommended_actions.is_none(),
            "Generation finished"
        );

        Ok(GeneratedFeedback {
            user_response: user_response
                .unwrap_or_else(|| prompts::FALLBACK_USER_RESPONSE.to_string()),
            summary: summary.unwrap_or_else(|| prompts::fallback_summary(rating)),
            recommended_actions: recommended_actions
                .unwrap_or_else(|| prompts::FALLBACK_ACTIONS.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ScriptedClient, ScriptedReply};

    #[tokio::test]
    async fn uses_model_text_when_available() {
        let client = Arc::new(ScriptedClient::new(vec![
            ScriptedReply::Text("Thanks so much!".into()),
            ScriptedReply::Text("Happy customer.".into()),
            ScriptedReply::Text("1. Keep it up".into()),
        ]));
        let generator = FeedbackGenerator::new(client.clone());

        let feedback = generator.generate(5, "Great service!").await.unwrap();

        assert_eq!(feedback.user_response, "Thanks so much!");
        assert_eq!(feedback.summary, "Happy customer.");
        assert_eq!(feedback.recommended_actions, "1. Keep it up");
        assert_eq!(client.requests().len(), 3);
    }

    #[tokio::test]
    async fn empty_replies_fall_back_per_call() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let generator = FeedbackGenerator::new(client);

        let feedback = generator.generate(3, "").await.unwrap();

        assert_eq!(feedback.user_response, prompts::FALLBACK_USER_RESPONSE);
        assert_eq!(feedback.summary, "Customer gave a 3-star rating.");
        assert_eq!(feedback.recommended_actions, prompts::FALLBACK_ACTIONS);
    }

    #[tokio::test]
    async fn any_failure_fails_the_whole_generation() {
        let client = Arc::new(ScriptedClient::new(vec![
            ScriptedReply::Text("Thanks!".into()),
            ScriptedReply::Fail("connection reset".into()),
            ScriptedReply::Text("1. Something".into()),
        ]));
        let generator = FeedbackGenerator::new(client);

        let err = generator.generate(4, "Nice").await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
