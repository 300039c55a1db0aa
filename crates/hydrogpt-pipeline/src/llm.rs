//! Model client implementation
//!
//! Anthropic Messages API client over reqwest. The client carries a bounded
//! request timeout; a timeout surfaces as an `HydroError::Llm` which the
//! pipeline degrades into an in-band envelope, never a dropped connection.

use async_trait::async_trait;
use hydrogpt_core::{HydroError, LlmClient, LlmConfig, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client
#[derive(Debug)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    /// Create from config; fails when no credential is configured
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .ok_or_else(|| HydroError::Config("Anthropic API key required".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HydroError::Config(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| HydroError::Llm(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(HydroError::Llm(format!(
                "Anthropic error ({status}): {error_text}"
            )));
        }

        let result: MessagesResponse = response
            .json()
            .await
            .map_err(|e| HydroError::Llm(format!("Failed to parse response: {e}")))?;

        result
            .content
            .iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text.clone())
            .ok_or_else(|| HydroError::Llm("No text content in response".to_string()))
    }
}

/// Build a model client when a credential is configured
pub fn create_llm_client(config: &LlmConfig) -> Result<Option<std::sync::Arc<dyn LlmClient>>> {
    if config.api_key.is_none() {
        return Ok(None);
    }
    Ok(Some(std::sync::Arc::new(AnthropicClient::from_config(
        config,
    )?)))
}
