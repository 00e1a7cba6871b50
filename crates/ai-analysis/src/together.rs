use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AiError, AiResult};
use crate::provider::{http_client, send_json, LlmProvider, PromptStyle};

const TOGETHER_API_URL: &str = "https://api.together.xyz/inference";
pub const DEFAULT_MODEL: &str = "togethercomputer/llama-2-70b-chat";

/// Together AI completion endpoint
pub struct TogetherProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl TogetherProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct TogetherRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    repetition_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct TogetherResponse {
    output: Option<TogetherOutput>,
}

#[derive(Debug, Deserialize)]
struct TogetherOutput {
    #[serde(default)]
    choices: Vec<TogetherChoice>,
}

#[derive(Debug, Deserialize)]
struct TogetherChoice {
    #[serde(default)]
    text: String,
}

fn response_text(response: TogetherResponse) -> Option<String> {
    response
        .output?
        .choices
        .into_iter()
        .next()
        .map(|c| c.text)
}

#[async_trait]
impl LlmProvider for TogetherProvider {
    fn name(&self) -> &'static str {
        "together"
    }

    fn prompt_style(&self) -> PromptStyle {
        PromptStyle::Structured
    }

    async fn complete(&self, prompt: &str) -> AiResult<String> {
        let request = TogetherRequest {
            model: &self.model,
            prompt,
            max_tokens: 1000,
            temperature: 0.7,
            top_p: 0.7,
            top_k: 50,
            repetition_penalty: 1.0,
        };

        let response: TogetherResponse = send_json(
            self.name(),
            self.client
                .post(TOGETHER_API_URL)
                .bearer_auth(&self.api_key)
                .json(&request),
        )
        .await?;

        response_text(response)
            .ok_or_else(|| AiError::InvalidResponse("No choices in Together response".to_string()))
    }
}
