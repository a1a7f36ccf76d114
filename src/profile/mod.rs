//! Agent profiles: named bundles of provider, model, prompt and capabilities.

pub mod repository;

pub use repository::{FileProfileRepository, InMemoryProfileRepository, ProfileRepository};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PROFILE_NAME: &str = "General Assistant";
pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Answer the user's questions as well as you can.";

/// Configuration the orchestrator reads for every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub id: Uuid,
    pub name: String,
    /// Provider identifier, resolved through the provider registry.
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub memory_enabled: bool,
    #[serde(default)]
    pub web_search_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgentProfile {
    /// New profile with memory and web search both off.
    pub fn new(name: impl Into<String>, provider: impl Into<String>, model: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            provider: provider.into(),
            model: model.into(),
            system_prompt: String::new(),
            memory_enabled: false,
            web_search_enabled: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The profile created when none is current.
    pub fn default_assistant() -> Self {
        Self::new(DEFAULT_PROFILE_NAME, DEFAULT_PROVIDER, DEFAULT_MODEL)
            .with_system_prompt(DEFAULT_SYSTEM_PROMPT)
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_memory(mut self, enabled: bool) -> Self {
        self.memory_enabled = enabled;
        self
    }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search_enabled = enabled;
        self
    }

    /// Apply the fields set in `update` and bump `updated_at`.
    pub fn update(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            name,
            provider,
            model,
            system_prompt,
            memory_enabled,
            web_search_enabled,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(provider) = provider {
            self.provider = provider;
        }
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(prompt) = system_prompt {
            self.system_prompt = prompt;
        }
        if let Some(enabled) = memory_enabled {
            self.memory_enabled = enabled;
        }
        if let Some(enabled) = web_search_enabled {
            self.web_search_enabled = enabled;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial edit of a profile; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub memory_enabled: Option<bool>,
    pub web_search_enabled: Option<bool>,
}
