//! Provider registry: provider identifier → adapter factory.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{ProviderAdapter, ProviderFactory};
use crate::config::{ChatConfig, CredentialResolver};
use crate::error::ChatError;

/// Registry mapping provider keys to their factories.
///
/// Keys are matched exactly first, then case-insensitively, so profiles
/// written as `"OpenAI"` and `"openai"` resolve to the same factory.
pub struct ProviderRegistry {
    factories: HashMap<String, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with every built-in provider enabled by feature flags,
    /// configured from `config`.
    #[allow(unused_variables, unused_mut)]
    pub fn builtin(config: &ChatConfig) -> Result<Self, ChatError> {
        let mut registry = Self::new();
        let client = crate::provider::http::build_client(config.request_timeout())?;

        #[cfg(feature = "openai")]
        registry.register(Arc::new(
            super::openai::OpenAiFactory::new(config.get_base_url(super::openai::PROVIDER_KEY))
                .with_temperature(config.temperature())
                .with_client(client.clone()),
        ));

        #[cfg(feature = "openrouter")]
        registry.register(Arc::new(
            super::openrouter::OpenRouterFactory::new(
                config.get_base_url(super::openrouter::PROVIDER_KEY),
            )
            .with_temperature(config.temperature())
            .with_attribution(config.settings().app_url.clone(), config.settings().app_name.clone())
            .with_client(client),
        ));

        Ok(registry)
    }

    /// Register a factory for all provider keys it declares.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        for key in factory.provider_keys() {
            self.factories.insert(key.to_string(), factory.clone());
        }
    }

    fn factory(&self, provider_key: &str) -> Option<&Arc<dyn ProviderFactory>> {
        self.factories.get(provider_key).or_else(|| {
            self.factories
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(provider_key.trim()))
                .map(|(_, factory)| factory)
        })
    }

    /// Resolve an adapter for a provider + model pair.
    ///
    /// Fails with [`ChatError::Configuration`] when the provider is unknown,
    /// the model is not supported, or no credential is available. No network
    /// call is made here.
    pub fn resolve(
        &self,
        provider_key: &str,
        model_id: &str,
        credentials: &dyn CredentialResolver,
    ) -> Result<Box<dyn ProviderAdapter>, ChatError> {
        let factory = self.factory(provider_key).ok_or_else(|| {
            ChatError::Configuration(format!("Unsupported provider '{provider_key}'"))
        })?;

        if !factory.supports_model(model_id) {
            return Err(ChatError::Configuration(format!(
                "Model '{model_id}' is not supported by provider '{provider_key}'"
            )));
        }

        let api_key = credentials
            .get(provider_key)
            .or_else(|| credentials.get(factory.credential_key()))
            .ok_or_else(|| {
                ChatError::Configuration(format!("No API key configured for '{provider_key}'"))
            })?;

        debug!(provider = provider_key, model = model_id, "resolved provider adapter");
        factory.create(api_key, model_id)
    }

    /// Check whether a factory is registered for the given key.
    pub fn has_provider(&self, provider_key: &str) -> bool {
        self.factory(provider_key).is_some()
    }

    /// List all registered provider keys.
    pub fn provider_keys(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::GenerateRequest;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubFactory;

    impl ProviderFactory for StubFactory {
        fn provider_keys(&self) -> &[&str] {
            &["stub", "Stub-Alias"]
        }

        fn supports_model(&self, model_id: &str) -> bool {
            model_id.starts_with("stub-")
        }

        fn create(&self, api_key: String, model_id: &str) -> Result<Box<dyn ProviderAdapter>, ChatError> {
            Ok(Box::new(StubAdapter {
                model_id: model_id.to_string(),
                api_key,
            }))
        }
    }

    struct StubAdapter {
        model_id: String,
        api_key: String,
    }

    #[async_trait]
    impl ProviderAdapter for StubAdapter {
        fn provider_name(&self) -> &str {
            "stub"
        }
        fn model_id(&self) -> &str {
            &self.model_id
        }
        async fn generate(&self, _request: &GenerateRequest) -> Result<String, ChatError> {
            Ok(self.api_key.clone())
        }
    }

    fn credentials(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn register_and_resolve() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubFactory));

        let adapter = registry
            .resolve("stub", "stub-small", &credentials(&[("stub", "key-1")]))
            .unwrap();
        assert_eq!(adapter.model_id(), "stub-small");
        let request = GenerateRequest::builder().prompt("hi").build();
        assert_eq!(adapter.generate(&request).await.unwrap(), "key-1");
    }

    #[test]
    fn lookup_is_case_insensitive_and_alias_aware() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubFactory));

        assert!(registry.has_provider("STUB"));
        assert!(registry.has_provider("stub-alias"));
        assert!(!registry.has_provider("other"));
    }

    #[test]
    fn alias_falls_back_to_canonical_credential() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubFactory));

        let adapter = registry.resolve("Stub-Alias", "stub-x", &credentials(&[("stub", "k")]));
        assert!(adapter.is_ok());
    }

    #[test]
    fn unsupported_provider_is_configuration_error() {
        let registry = ProviderRegistry::new();
        match registry.resolve("nope", "m", &credentials(&[])) {
            Err(ChatError::Configuration(msg)) => assert!(msg.contains("nope")),
            Err(e) => panic!("expected Configuration, got error: {e}"),
            Ok(_) => panic!("expected Configuration, got Ok"),
        }
    }

    #[test]
    fn unsupported_model_is_configuration_error() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubFactory));
        let result = registry.resolve("stub", "gpt-4o", &credentials(&[("stub", "k")]));
        assert!(matches!(result, Err(ChatError::Configuration(_))));
    }

    #[test]
    fn missing_credential_is_configuration_error() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubFactory));
        let result = registry.resolve("stub", "stub-small", &credentials(&[]));
        match result {
            Err(ChatError::Configuration(msg)) => assert!(msg.contains("API key")),
            _ => panic!("expected Configuration error"),
        }
    }

    #[test]
    fn builtin_registry_knows_openai_and_openrouter() {
        let config = ChatConfig::new().with_credential_store(None);
        let registry = ProviderRegistry::builtin(&config).unwrap();
        assert!(registry.has_provider("openai"));
        assert!(registry.has_provider("OpenAI"));
        assert!(registry.has_provider("openrouter"));
        assert!(registry.has_provider("OpenRouter"));
    }
}
