use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{AiError, AiResult};

/// Which prompt template and response parser a provider pairs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// `INSIGHTS:` / `INVESTMENT_SUMMARY:` sections
    Structured,
    /// Free-form analyst write-up
    Narrative,
}

/// A hosted text-completion service.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn prompt_style(&self) -> PromptStyle;

    /// Send one prompt and return the raw completion text.
    async fn complete(&self, prompt: &str) -> AiResult<String>;
}

pub type SharedProvider = Arc<dyn LlmProvider>;

pub(crate) fn http_client(timeout: Duration) -> Client {
    build_client(Client::builder().timeout(timeout))
}

fn build_client(builder: ClientBuilder) -> Client {
    builder.build().unwrap_or_else(|e| {
        tracing::warn!("Falling back to a default HTTP client for AI providers: {}", e);
        Client::new()
    })
}

/// Send a request and decode a successful JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(provider: &str, request: RequestBuilder) -> AiResult<T> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AiError::ServiceUnavailable(format!(
            "{} returned {}: {}",
            provider, status, body
        )));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_builder_falls_back_to_default_client() {
        let client = build_client(Client::builder().user_agent("bad\nagent"));
        assert!(client.post("http://localhost/").build().is_ok());
    }
}
