use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ExternalServiceError, GenerationRequest, TextGenerator};

/// Replays queued outputs in order and records every request it receives.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<Option<String>, ExternalServiceError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(Some(text.into())))
    }

    pub fn reply_empty(self) -> Self {
        self.push(Ok(None))
    }

    pub fn fail(self, status: u16, body: &str) -> Self {
        self.push(Err(ExternalServiceError::Api {
            status,
            body: body.to_string(),
        }))
    }

    fn push(self, reply: Result<Option<String>, ExternalServiceError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Option<String>, ExternalServiceError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ExternalServiceError::Decode("script exhausted".into())))
    }
}
