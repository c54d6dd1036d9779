//! @ai:module:intent Chat completions client for sweep execution
//! @ai:module:layer infrastructure
//! @ai:module:public_api OpenAiClient, CompletionResponse, CompletionClientTrait
//! @ai:module:stateless false

use crate::config::ApiConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// @ai:intent Trait for the completion client
#[allow(async_fn_in_trait)]
pub trait CompletionClientTrait: Send + Sync {
    /// @ai:intent Request a completion under a token budget
    async fn complete(&self, prompt: &str, max_completion_tokens: u32)
        -> Result<CompletionResponse>;
}

/// @ai:intent Completion reply with token accounting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub reasoning_tokens: u32,
    pub total_tokens: u32,
    pub finish_reason: String,
}

/// @ai:intent Chat completions request body
#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_completion_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// @ai:intent Chat completions response body
#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    /// Null when the budget is exhausted before any visible output
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
    #[serde(default)]
    completion_tokens_details: Option<CompletionTokensDetails>,
}

/// @ai:intent Reasoning token breakdown, absent on non-reasoning models
#[derive(Debug, Default, Deserialize)]
struct CompletionTokensDetails {
    #[serde(default)]
    reasoning_tokens: u32,
}

/// @ai:intent Chat completions API client
pub struct OpenAiClient {
    client: reqwest::Client,
    config: ApiConfig,
    api_key: String,
}

impl OpenAiClient {
    /// @ai:intent Create a new completion client
    /// @ai:pre OPENAI_API_KEY environment variable is set
    /// @ai:effects env
    pub fn new(config: ApiConfig) -> Result<Self> {
        let api_key =
            std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set in environment")?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// @ai:intent Create a client with an explicit key (for testing)
    /// @ai:effects pure
    pub fn with_api_key(config: ApiConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

impl CompletionClientTrait for OpenAiClient {
    /// @ai:intent Request a completion under a token budget
    /// @ai:effects network
    async fn complete(
        &self,
        prompt: &str,
        max_completion_tokens: u32,
    ) -> Result<CompletionResponse> {
        let request = ApiRequest {
            model: &self.config.model,
            max_completion_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to completions API")?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Completions API error ({}): {}", status, error_text);
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .context("Failed to parse completions API response")?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .context("Completions API returned no choices")?;

        let reasoning_tokens = api_response
            .usage
            .completion_tokens_details
            .unwrap_or_default()
            .reasoning_tokens;

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            input_tokens: api_response.usage.prompt_tokens,
            output_tokens: api_response.usage.completion_tokens,
            reasoning_tokens,
            total_tokens: api_response.usage.total_tokens,
            finish_reason: choice.finish_reason.unwrap_or_default(),
        })
    }
}

/// @ai:intent Mock client for testing and dry runs
pub struct MockCompletionClient {
    content: String,
    reasoning_tokens: u32,
}

impl MockCompletionClient {
    /// @ai:intent Create a mock client that returns a fixed reply
    /// @ai:effects pure
    pub fn new(content: String, reasoning_tokens: u32) -> Self {
        Self {
            content,
            reasoning_tokens,
        }
    }
}

impl CompletionClientTrait for MockCompletionClient {
    /// @ai:intent Return mock completion
    /// @ai:effects pure
    async fn complete(
        &self,
        prompt: &str,
        max_completion_tokens: u32,
    ) -> Result<CompletionResponse> {
        let input_tokens = (prompt.len() / 4) as u32;
        let reasoning_tokens = self.reasoning_tokens.min(max_completion_tokens);
        let output_tokens = reasoning_tokens + 8;

        Ok(CompletionResponse {
            content: self.content.clone(),
            input_tokens,
            output_tokens,
            reasoning_tokens,
            total_tokens: input_tokens + output_tokens,
            finish_reason: "stop".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_caps_reasoning_at_budget() {
        let client = MockCompletionClient::new("9.8".to_string(), 500);

        let response = client.complete("what's larger?", 200).await.unwrap();
        assert_eq!(response.reasoning_tokens, 200);

        let response = client.complete("what's larger?", 2000).await.unwrap();
        assert_eq!(response.reasoning_tokens, 500);
    }

    #[test]
    fn test_usage_parses_without_reasoning_details() {
        let raw = r#"{
            "choices": [{"message": {"content": "9.8"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 30, "completion_tokens": 12, "total_tokens": 42}
        }"#;

        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.usage.completion_tokens_details.is_none());
        assert_eq!(parsed.usage.total_tokens, 42);
    }

    #[test]
    fn test_usage_parses_reasoning_details() {
        let raw = r#"{
            "choices": [{"message": {"content": null}, "finish_reason": "length"}],
            "usage": {
                "prompt_tokens": 30,
                "completion_tokens": 100,
                "total_tokens": 130,
                "completion_tokens_details": {"reasoning_tokens": 100}
            }
        }"#;

        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        let details = parsed.usage.completion_tokens_details.unwrap();
        assert_eq!(details.reasoning_tokens, 100);
        assert!(parsed.choices[0].message.content.is_none());
    }
}
