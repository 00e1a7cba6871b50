pub mod analyzer;
pub mod error;
pub mod fallback;
pub mod gemini;
pub mod groq;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod together;

pub use analyzer::AiAnalyzer;
pub use error::{AiError, AiResult};
pub use gemini::GeminiProvider;
pub use groq::GroqProvider;
pub use provider::{LlmProvider, PromptStyle, SharedProvider};
pub use together::TogetherProvider;

use std::str::FromStr;
use std::time::Duration;

/// Hosted LLM services the analyzer knows how to call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Together,
    Groq,
    Gemini,
}

impl FromStr for ProviderKind {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "together" => Ok(ProviderKind::Together),
            "groq" => Ok(ProviderKind::Groq),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(AiError::Config(format!("Unknown AI provider '{}'", other))),
        }
    }
}

/// Configuration for the AI providers
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub together_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub together_model: String,
    pub groq_model: String,
    pub gemini_model: String,
    pub provider_order: Vec<ProviderKind>,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            together_api_key: None,
            groq_api_key: None,
            gemini_api_key: None,
            together_model: together::DEFAULT_MODEL.to_string(),
            groq_model: groq::DEFAULT_MODEL.to_string(),
            gemini_model: gemini::DEFAULT_MODEL.to_string(),
            provider_order: vec![ProviderKind::Together, ProviderKind::Groq, ProviderKind::Gemini],
            timeout: Duration::from_secs(30),
        }
    }
}

impl AiConfig {
    /// Load configuration from environment variables. Missing keys disable the provider.
    pub fn from_env() -> AiResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AiResult<Self> {
        let defaults = Self::default();
        let value = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout = match value("AI_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse()
                    .map_err(|e| AiError::Config(format!("AI_TIMEOUT_SECS: {}", e)))?,
            ),
            None => defaults.timeout,
        };

        let provider_order = match value("AI_PROVIDER_ORDER") {
            Some(order) => parse_provider_order(&order)?,
            None => defaults.provider_order,
        };

        Ok(Self {
            together_api_key: value("TOGETHER_API_KEY"),
            groq_api_key: value("GROQ_API_KEY"),
            gemini_api_key: value("GEMINI_API_KEY"),
            together_model: value("TOGETHER_MODEL").unwrap_or(defaults.together_model),
            groq_model: value("GROQ_MODEL").unwrap_or(defaults.groq_model),
            gemini_model: value("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            provider_order,
            timeout,
        })
    }
}

/// Parse a comma-separated provider list, e.g. `groq,gemini`.
pub fn parse_provider_order(order: &str) -> AiResult<Vec<ProviderKind>> {
    let mut kinds = Vec::new();
    for name in order.split(',').filter(|s| !s.trim().is_empty()) {
        let kind: ProviderKind = name.parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}
