use std::sync::Arc;

use analysis_core::{InsightGenerator, InsightReport, StockSnapshot};
use async_trait::async_trait;

use crate::error::AiResult;
use crate::fallback::basic_analysis;
use crate::parser::{parse_narrative, parse_structured};
use crate::prompt::build_prompt;
use crate::provider::{PromptStyle, SharedProvider};
use crate::{AiConfig, GeminiProvider, GroqProvider, ProviderKind, TogetherProvider};

/// Tries each configured provider in order and falls back to rule-based text.
///
/// The first provider whose response is non-blank wins. Provider errors are
/// logged and never surface to the caller.
pub struct AiAnalyzer {
    providers: Vec<SharedProvider>,
}

impl AiAnalyzer {
    pub fn new(providers: Vec<SharedProvider>) -> Self {
        Self { providers }
    }

    /// Register the providers that have an API key, in configured order.
    pub fn from_config(config: &AiConfig) -> Self {
        let mut providers: Vec<SharedProvider> = Vec::new();

        for kind in &config.provider_order {
            match kind {
                ProviderKind::Together => {
                    if let Some(key) = &config.together_api_key {
                        providers.push(Arc::new(
                            TogetherProvider::new(key.clone(), config.timeout)
                                .with_model(config.together_model.clone()),
                        ));
                    }
                }
                ProviderKind::Groq => {
                    if let Some(key) = &config.groq_api_key {
                        providers.push(Arc::new(
                            GroqProvider::new(key.clone(), config.timeout)
                                .with_model(config.groq_model.clone()),
                        ));
                    }
                }
                ProviderKind::Gemini => {
                    if let Some(key) = &config.gemini_api_key {
                        providers.push(Arc::new(
                            GeminiProvider::new(key.clone(), config.timeout)
                                .with_model(config.gemini_model.clone()),
                        ));
                    }
                }
            }
        }

        Self::new(providers)
    }

    pub fn from_env() -> AiResult<Self> {
        let analyzer = Self::from_config(&AiConfig::from_env()?);
        if analyzer.providers.is_empty() {
            tracing::warn!("No AI provider keys configured; using rule-based analysis only");
        } else {
            tracing::info!("AI providers: {}", analyzer.provider_names().join(", "));
        }
        Ok(analyzer)
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn analyze(&self, snapshot: &StockSnapshot) -> InsightReport {
        for provider in &self.providers {
            let style = provider.prompt_style();
            let prompt = build_prompt(style, snapshot);

            match provider.complete(&prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    tracing::info!(
                        "{} analysis for {} from {}",
                        style_label(style),
                        snapshot.symbol,
                        provider.name()
                    );
                    let mut report = match style {
                        PromptStyle::Structured => parse_structured(&text),
                        PromptStyle::Narrative => parse_narrative(&text),
                    };
                    report.source = provider.name().to_string();
                    return report;
                }
                Ok(_) => tracing::warn!(
                    "{} returned an empty response for {}",
                    provider.name(),
                    snapshot.symbol
                ),
                Err(e) => {
                    tracing::warn!("{} failed for {}: {}", provider.name(), snapshot.symbol, e)
                }
            }
        }

        tracing::info!("Using rule-based analysis for {}", snapshot.symbol);
        basic_analysis(snapshot)
    }
}

fn style_label(style: PromptStyle) -> &'static str {
    match style {
        PromptStyle::Structured => "Structured",
        PromptStyle::Narrative => "Narrative",
    }
}

#[async_trait]
impl InsightGenerator for AiAnalyzer {
    async fn generate(&self, snapshot: &StockSnapshot) -> InsightReport {
        self.analyze(snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiError;
    use crate::provider::LlmProvider;
    use analysis_core::Recommendation;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeProvider {
        name: &'static str,
        style: PromptStyle,
        reply: Result<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(name: &'static str, style: PromptStyle, reply: Result<&'static str, &'static str>) -> Arc<Self> {
            Arc::new(Self { name, style, reply, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl LlmProvider for FakeProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn prompt_style(&self) -> PromptStyle {
            self.style
        }

        async fn complete(&self, _prompt: &str) -> AiResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .map_err(|e| AiError::ServiceUnavailable(e.to_string()))
        }
    }

    fn snapshot() -> StockSnapshot {
        let mut s = StockSnapshot::new("INFY.NS", "Infosys Limited", 1500.0);
        s.pe_ratio = Some(12.0);
        s
    }

    #[tokio::test]
    async fn test_first_usable_provider_wins() {
        let failing = FakeProvider::new("together", PromptStyle::Structured, Err("502"));
        let blank = FakeProvider::new("groq", PromptStyle::Structured, Ok("   \n"));
        let gemini = FakeProvider::new(
            "gemini",
            PromptStyle::Narrative,
            Ok("Key insights:\n- One\n- Two\n- Three\nRecommendation:\nWe rate it a Buy."),
        );
        let unused = FakeProvider::new("spare", PromptStyle::Structured, Ok("INSIGHTS:\n- x"));

        let providers: Vec<SharedProvider> =
            vec![failing.clone(), blank.clone(), gemini, unused.clone()];
        let report = AiAnalyzer::new(providers).analyze(&snapshot()).await;

        assert_eq!(report.source, "gemini");
        assert_eq!(report.insights, vec!["One", "Two", "Three"]);
        assert_eq!(report.recommendation, Some(Recommendation::Buy));
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(blank.calls.load(Ordering::SeqCst), 1);
        assert_eq!(unused.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_structured_provider_uses_structured_parser() {
        let groq = FakeProvider::new(
            "groq",
            PromptStyle::Structured,
            Ok("INSIGHTS:\n• Cheap on earnings\nINVESTMENT_SUMMARY:\nWorth a look."),
        );
        let providers: Vec<SharedProvider> = vec![groq];
        let analyzer = AiAnalyzer::new(providers);
        let report = analyzer.generate(&snapshot()).await;

        assert_eq!(report.source, "groq");
        assert_eq!(report.insights, vec!["Cheap on earnings"]);
        assert_eq!(report.investment_summary, "Worth a look.");
    }

    #[tokio::test]
    async fn test_exhaustion_returns_rule_based() {
        let providers: Vec<SharedProvider> = vec![
            FakeProvider::new("together", PromptStyle::Structured, Err("timeout")),
            FakeProvider::new("gemini", PromptStyle::Narrative, Ok("")),
        ];
        let report = AiAnalyzer::new(providers).analyze(&snapshot()).await;

        assert_eq!(report.source, "rule-based");
        assert!(report.insights[0].contains("undervalued"));
    }

    #[tokio::test]
    async fn test_no_providers_is_rule_based() {
        let report = AiAnalyzer::new(Vec::new()).analyze(&snapshot()).await;
        assert_eq!(report.source, "rule-based");
    }

    #[test]
    fn test_from_config_skips_missing_keys_and_keeps_order() {
        let config = AiConfig {
            groq_api_key: Some("g".to_string()),
            gemini_api_key: Some("m".to_string()),
            provider_order: vec![ProviderKind::Gemini, ProviderKind::Together, ProviderKind::Groq],
            timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let analyzer = AiAnalyzer::from_config(&config);
        assert_eq!(analyzer.provider_names(), vec!["gemini", "groq"]);
    }
}
