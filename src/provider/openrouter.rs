//! OpenRouter adapter (OpenAI-compatible wire format).

use async_trait::async_trait;

use crate::error::ChatError;

use super::factory::ProviderFactory;
use super::openai::{OpenAiAdapter, DEFAULT_TEMPERATURE};
use super::{GenerateRequest, ProviderAdapter};

pub const PROVIDER_KEY: &str = "openrouter";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenRouter routes to many upstream models through one OpenAI-style API.
pub struct OpenRouterAdapter {
    inner: OpenAiAdapter,
}

impl OpenRouterAdapter {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            inner: OpenAiAdapter::new(model, api_key, Some(base_url)).with_provider_name(PROVIDER_KEY),
        }
    }

    /// Set the optional app attribution headers OpenRouter shows in its rankings.
    pub fn with_attribution(mut self, referer: Option<String>, title: Option<String>) -> Self {
        if let Some(referer) = referer {
            self.inner = self.inner.with_header("HTTP-Referer", referer);
        }
        if let Some(title) = title {
            self.inner = self.inner.with_header("X-Title", title);
        }
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.inner = self.inner.with_temperature(temperature);
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.inner = self.inner.with_client(client);
        self
    }
}

#[async_trait]
impl ProviderAdapter for OpenRouterAdapter {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, ChatError> {
        self.inner.generate(request).await
    }
}

#[derive(Debug, Clone)]
pub struct OpenRouterFactory {
    base_url: Option<String>,
    temperature: f64,
    referer: Option<String>,
    title: Option<String>,
    client: Option<reqwest::Client>,
}

impl OpenRouterFactory {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url,
            temperature: DEFAULT_TEMPERATURE,
            referer: None,
            title: None,
            client: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_attribution(mut self, referer: Option<String>, title: Option<String>) -> Self {
        self.referer = referer;
        self.title = title;
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }
}

impl Default for OpenRouterFactory {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ProviderFactory for OpenRouterFactory {
    fn provider_keys(&self) -> &[&str] {
        &[PROVIDER_KEY, "OpenRouter"]
    }

    /// OpenRouter model ids are namespaced, e.g. `openai/gpt-4o`.
    fn supports_model(&self, model_id: &str) -> bool {
        let model_id = model_id.trim();
        !model_id.is_empty() && !model_id.starts_with('/') && !model_id.ends_with('/')
    }

    fn create(&self, api_key: String, model_id: &str) -> Result<Box<dyn ProviderAdapter>, ChatError> {
        let mut adapter = OpenRouterAdapter::new(model_id, api_key, self.base_url.clone())
            .with_temperature(self.temperature)
            .with_attribution(self.referer.clone(), self.title.clone());
        if let Some(ref client) = self.client {
            adapter = adapter.with_client(client.clone());
        }
        Ok(Box::new(adapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_reports_openrouter_identity() {
        let adapter = OpenRouterAdapter::new("anthropic/claude-3.5-sonnet", "sk-or", None);
        assert_eq!(adapter.provider_name(), "openrouter");
        assert_eq!(adapter.model_id(), "anthropic/claude-3.5-sonnet");
    }

    #[test]
    fn factory_rejects_malformed_model_ids() {
        let factory = OpenRouterFactory::default();
        assert!(factory.supports_model("openai/gpt-4o"));
        assert!(!factory.supports_model(""));
        assert!(!factory.supports_model("openai/"));
    }
}
