//! Provider factory trait for creating ProviderAdapter instances.

use super::ProviderAdapter;
use crate::error::ChatError;

/// Factory for creating adapters from a credential + model ID.
///
/// Everything other than the credential and the model (base URL, temperature,
/// HTTP client) is fixed when the factory is constructed.
pub trait ProviderFactory: Send + Sync {
    /// Provider key(s) this factory handles (e.g., &["openai", "OpenAI"]).
    /// The first key is the canonical one.
    fn provider_keys(&self) -> &[&str];

    /// Service name used for the credential lookup fallback.
    fn credential_key(&self) -> &str {
        self.provider_keys().first().copied().unwrap_or_default()
    }

    /// Whether this provider can serve the given model ID.
    fn supports_model(&self, model_id: &str) -> bool {
        !model_id.trim().is_empty()
    }

    /// Create an adapter for the given model ID.
    fn create(&self, api_key: String, model_id: &str) -> Result<Box<dyn ProviderAdapter>, ChatError>;
}
