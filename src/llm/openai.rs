use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{ExternalServiceError, GenerationRequest, TextGenerator};
use crate::config::OpenAiConfig;

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<TextOptions<'a>>,
}

#[derive(Debug, Serialize)]
struct TextOptions<'a> {
    format: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    name: &'static str,
    schema: &'a Value,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentPart {
    #[serde(rename = "type", default)]
    part_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesResponse {
    fn into_output_text(self) -> Option<String> {
        if let Some(text) = self.output_text.filter(|t| !t.is_empty()) {
            return Some(text);
        }
        let joined: String = self
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.part_type == "output_text")
            .filter_map(|part| part.text)
            .collect();
        (!joined.is_empty()).then_some(joined)
    }
}

/// Responses API client.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig, api_key: &str) -> Result<Self, ExternalServiceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    #[instrument(skip(self, request), fields(model = %self.model, input_len = request.input.len()))]
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Option<String>, ExternalServiceError> {
        let body = ResponsesRequest {
            model: &self.model,
            instructions: &request.instructions,
            input: &request.input,
            text: request.format.as_ref().map(|schema| TextOptions {
                format: JsonSchemaFormat {
                    format_type: "json_schema",
                    name: "meals",
                    schema,
                },
            }),
        };

        let response = self
            .http
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ExternalServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let parsed: ResponsesResponse = serde_json::from_str(&raw)
            .map_err(|e| ExternalServiceError::Decode(e.to_string()))?;
        let text = parsed.into_output_text();
        debug!(has_output = text.is_some(), "generation response received");
        Ok(text)
    }
}
