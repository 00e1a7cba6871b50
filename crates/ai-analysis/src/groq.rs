use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AiError, AiResult};
use crate::provider::{http_client, send_json, LlmProvider, PromptStyle};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";
const SYSTEM_PROMPT: &str = "You are a professional financial analyst providing stock analysis.";

/// Groq OpenAI-compatible chat completions
pub struct GroqProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GroqProvider {
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
struct GroqRequest<'a> {
    model: &'a str,
    messages: Vec<GroqMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct GroqMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    #[serde(default)]
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
}

#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn response_text(response: GroqResponse) -> Option<String> {
    response.choices.into_iter().next()?.message.content
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn prompt_style(&self) -> PromptStyle {
        PromptStyle::Structured
    }

    async fn complete(&self, prompt: &str) -> AiResult<String> {
        let request = GroqRequest {
            model: &self.model,
            messages: vec![
                GroqMessage { role: "system", content: SYSTEM_PROMPT },
                GroqMessage { role: "user", content: prompt },
            ],
            max_tokens: 1000,
            temperature: 0.7,
        };

        let response: GroqResponse = send_json(
            self.name(),
            self.client
                .post(GROQ_API_URL)
                .bearer_auth(&self.api_key)
                .json(&request),
        )
        .await?;

        response_text(response)
            .ok_or_else(|| AiError::InvalidResponse("No response from Groq".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_text_reads_message_content() {
        let response: GroqResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "INSIGHTS:\n- Cheap" } }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
        }))
        .unwrap();
        assert_eq!(response_text(response).unwrap(), "INSIGHTS:\n- Cheap");
    }

    #[test]
    fn test_response_text_without_choices() {
        let response: GroqResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(response_text(response).is_none());

        let response: GroqResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        assert!(response_text(response).is_none());
    }

    #[test]
    fn test_request_carries_system_message() {
        let request = GroqRequest {
            model: DEFAULT_MODEL,
            messages: vec![
                GroqMessage { role: "system", content: SYSTEM_PROMPT },
                GroqMessage { role: "user", content: "Analyze TCS" },
            ],
            max_tokens: 1000,
            temperature: 0.7,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["content"], "Analyze TCS");
    }
}
