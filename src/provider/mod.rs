//! Provider adapter trait, request composition and built-in adapters.

pub mod factory;
pub mod http;
pub mod registry;

#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "openrouter")]
pub mod openrouter;

pub use factory::ProviderFactory;
pub use registry::ProviderRegistry;

use async_trait::async_trait;
use bon::Builder;

use crate::error::ChatError;
use crate::types::ChatMessage;

/// Label that prefixes the synthetic memory system message.
pub const MEMORY_LABEL: &str = "Previous conversation:";

/// Label that prefixes the synthetic search-context system message.
pub const SEARCH_LABEL: &str = "Web search results:";

/// Everything a provider needs to answer one user turn.
///
/// ```
/// use parley::provider::GenerateRequest;
///
/// let request = GenerateRequest::builder()
///     .prompt("What is Rust?")
///     .system_prompt("Be brief.")
///     .build();
/// assert_eq!(request.compose().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct GenerateRequest {
    #[builder(into)]
    pub prompt: String,
    #[builder(into)]
    pub system_prompt: Option<String>,
    pub memory: Option<Vec<String>>,
    #[builder(into)]
    pub search_context: Option<String>,
}

impl GenerateRequest {
    /// Build the ordered message list sent to the model.
    ///
    /// Order is fixed: system prompt, memory block, search block, user prompt.
    /// Blank system prompts and empty memory or search context are omitted.
    pub fn compose(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(4);

        if let Some(system) = self
            .system_prompt
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            messages.push(ChatMessage::system(system));
        }

        if let Some(lines) = self.memory.as_deref().filter(|l| !l.is_empty()) {
            messages.push(ChatMessage::system(format!(
                "{MEMORY_LABEL}\n{}",
                lines.join("\n")
            )));
        }

        if let Some(context) = self.search_context.as_deref().filter(|c| !c.is_empty()) {
            messages.push(ChatMessage::system(format!("{SEARCH_LABEL}\n{context}")));
        }

        messages.push(ChatMessage::user(self.prompt.clone()));
        messages
    }
}

/// Uniform interface to a remote text-generation endpoint.
///
/// Adapters are single-shot: they never retry, and hold nothing beyond their
/// fixed credential and model configuration.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider name (e.g., "openai", "openrouter").
    fn provider_name(&self) -> &str;
    /// The model ID this adapter instance serves.
    fn model_id(&self) -> &str;

    /// Generate the assistant reply for one request.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ChatError>;
}
