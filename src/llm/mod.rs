pub mod mock;
pub mod openai;
pub mod prompts;

pub use mock::{ScriptedClient, ScriptedReply};
pub use openai::OpenAiClient;

use async_trait::async_trait;
use thiserror::Error;

/// A single text-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model provider api key is not configured")]
    MissingApiKey,
    #[error("model provider request timed out")]
    Timeout,
    #[error("model provider request failed: {0}")]
    Transport(String),
    #[error("model provider returned status {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("model provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Text generation backend.
///
/// `Ok(None)` means the provider answered but produced no usable text;
/// callers decide what to substitute.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Option<String>, LlmError>;
}

/// Collapse whitespace-only output into `None`.
pub(crate) fn usable_text(content: Option<String>) -> Option<String> {
    content
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
