use super::{GenerationRequest, LlmError, ModelClient};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// One scripted answer from [`ScriptedClient`].
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Empty,
    Fail(String),
}

/// A model client for tests. Pops replies in call order and records the
/// requests it was given. Once the script runs out every call gets the
/// fallback reply (`Empty` unless set otherwise).
pub struct ScriptedClient {
    replies: Mutex<VecDeque<ScriptedReply>>,
    fallback: ScriptedReply,
    seen: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: ScriptedReply::Empty,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Every call answers with the same text.
    pub fn always(text: &str) -> Self {
        Self::new(Vec::new()).with_fallback(ScriptedReply::Text(text.to_string()))
    }

    /// Every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::new(Vec::new()).with_fallback(ScriptedReply::Fail(message.to_string()))
    }

    pub fn with_fallback(mut self, reply: ScriptedReply) -> Self {
        self.fallback = reply;
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.seen).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Option<String>, LlmError> {
        lock(&self.seen).push(request);
        let reply = lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            ScriptedReply::Text(text) => Ok(Some(text)),
            ScriptedReply::Empty => Ok(None),
            ScriptedReply::Fail(message) => Err(LlmError::Transport(message)),
        }
    }
}
