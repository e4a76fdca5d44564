//! Client seam for the external text-generation service.

mod openai;
#[cfg(test)]
pub mod scripted;

use async_trait::async_trait;
use serde_json::Value;

pub use openai::OpenAiClient;

/// One call against the generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub instructions: String,
    pub input: String,
    /// JSON schema the output must follow; `None` asks for free text.
    pub format: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExternalServiceError {
    #[error("request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("could not decode generation service response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the output text, or `None` when the service answered without any.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Option<String>, ExternalServiceError>;
}
