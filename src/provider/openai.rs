//! OpenAI Chat Completions adapter.
//!
//! Also serves as the transport for other OpenAI-compatible endpoints
//! (see [`super::openrouter`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ChatError;
use crate::types::ChatMessage;

use super::factory::ProviderFactory;
use super::http::{bearer_headers, encode_body, extend_headers, shared_client, status_to_error};
use super::{GenerateRequest, ProviderAdapter};

pub const PROVIDER_KEY: &str = "openai";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

pub struct OpenAiAdapter {
    provider_name: String,
    model: String,
    api_key: String,
    base_url: String,
    temperature: f64,
    extra_headers: Vec<(String, String)>,
    client: reqwest::Client,
}

impl OpenAiAdapter {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            provider_name: PROVIDER_KEY.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: DEFAULT_TEMPERATURE,
            extra_headers: Vec::new(),
            client: shared_client().clone(),
        }
    }

    /// Report a different provider name (for compatible endpoints).
    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Send an additional header with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, ChatError> {
        if self.api_key.trim().is_empty() {
            return Err(ChatError::InvalidCredential(format!(
                "Empty API key for {}",
                self.provider_name
            )));
        }

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: request.compose(),
            temperature: self.temperature,
        };

        let payload = encode_body(&body)?;
        let mut headers = bearer_headers(&self.api_key);
        extend_headers(&mut headers, &self.extra_headers);

        debug!(
            provider = %self.provider_name,
            model = %self.model,
            messages = body.messages.len(),
            "chat completion request"
        );

        let resp = self
            .client
            .post(self.endpoint())
            .headers(headers)
            .body(payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body_text));
        }

        let data: ChatCompletionResponse = resp.json().await.map_err(|e| {
            ChatError::ServiceUnavailable(format!("Malformed chat completion response: {e}"))
        })?;

        data.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ChatError::ServiceUnavailable(format!(
                    "No completion choice in {} response",
                    self.provider_name
                ))
            })
    }
}

/// Creates [`OpenAiAdapter`]s with settings fixed at startup.
#[derive(Debug, Clone)]
pub struct OpenAiFactory {
    base_url: Option<String>,
    temperature: f64,
    client: Option<reqwest::Client>,
}

impl OpenAiFactory {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url,
            temperature: DEFAULT_TEMPERATURE,
            client: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }
}

impl Default for OpenAiFactory {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ProviderFactory for OpenAiFactory {
    fn provider_keys(&self) -> &[&str] {
        &[PROVIDER_KEY, "OpenAI"]
    }

    fn create(&self, api_key: String, model_id: &str) -> Result<Box<dyn ProviderAdapter>, ChatError> {
        let mut adapter = OpenAiAdapter::new(model_id, api_key, self.base_url.clone())
            .with_temperature(self.temperature);
        if let Some(ref client) = self.client {
            adapter = adapter.with_client(client.clone());
        }
        Ok(Box::new(adapter))
    }
}

// Wire types (internal)

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let adapter = OpenAiAdapter::new("gpt-4o", "sk", Some("http://localhost:9/v1/".into()));
        assert_eq!(adapter.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn defaults_point_at_openai() {
        let adapter = OpenAiAdapter::new(DEFAULT_MODEL, "sk", None);
        assert_eq!(adapter.base_url(), DEFAULT_BASE_URL);
        assert_eq!(adapter.provider_name(), "openai");
        assert_eq!(adapter.model_id(), "gpt-3.5-turbo");
    }

    #[tokio::test]
    async fn empty_key_is_rejected_before_any_request() {
        let adapter = OpenAiAdapter::new("gpt-4o", "  ", Some("http://[::1".into()));
        let request = GenerateRequest::builder().prompt("hi").build();
        let err = adapter.generate(&request).await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidCredential(_)));
    }

    #[test]
    fn request_body_matches_wire_shape() {
        let body = ChatCompletionRequest {
            model: "gpt-4o",
            messages: vec![ChatMessage::user("hi")],
            temperature: 0.7,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 0.7,
            })
        );
    }

    #[test]
    fn factory_answers_to_both_spellings() {
        let factory = OpenAiFactory::default();
        assert!(factory.provider_keys().contains(&"openai"));
        assert!(factory.provider_keys().contains(&"OpenAI"));
        let adapter = factory.create("sk".into(), "gpt-4o").unwrap();
        assert_eq!(adapter.model_id(), "gpt-4o");
    }
}
