use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AiError, AiResult};
use crate::provider::{http_client, send_json, LlmProvider, PromptStyle};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Google Gemini `generateContent`
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
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

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.model)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

fn response_text(response: GeminiResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    Some(content.parts.into_iter().filter_map(|p| p.text).collect())
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn prompt_style(&self) -> PromptStyle {
        PromptStyle::Narrative
    }

    async fn complete(&self, prompt: &str) -> AiResult<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent { parts: vec![GeminiPart { text: prompt }] }],
        };

        let response: GeminiResponse = send_json(
            self.name(),
            self.client
                .post(self.endpoint())
                .header("x-goog-api-key", &self.api_key)
                .json(&request),
        )
        .await?;

        response_text(response)
            .ok_or_else(|| AiError::InvalidResponse("No candidates in Gemini response".to_string()))
    }
}
