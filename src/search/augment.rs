//! Search augmentation: turns a query into context text for the model.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ChatError;

/// Result of one augmentation. Transient; consumed by a single turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub query: String,
    pub text: String,
}

/// Produces search context for a query.
///
/// Callers must treat failures as "no context" rather than aborting a turn.
#[async_trait]
pub trait SearchAugmenter: Send + Sync {
    async fn augment(&self, query: &str) -> Result<SearchResult, ChatError>;
}

/// Stand-in backend: waits a fixed latency, then returns a canned summary
/// mentioning the query.
#[derive(Debug, Clone)]
pub struct SimulatedSearch {
    latency: Duration,
}

impl SimulatedSearch {
    pub const DEFAULT_LATENCY: Duration = Duration::from_secs(1);

    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedSearch {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATENCY)
    }
}

#[async_trait]
impl SearchAugmenter for SimulatedSearch {
    async fn augment(&self, query: &str) -> Result<SearchResult, ChatError> {
        debug!(query, latency_ms = self.latency.as_millis() as u64, "simulated search");
        tokio::time::sleep(self.latency).await;

        let text = format!(
            "Search results for \"{query}\":\n\n\
             1. [Example Site 1] - Detailed background on this topic.\n\
             2. [Example Site 2] - Recent developments and trends.\n\
             3. [Example Site 3] - Expert opinions and analysis.\n\n\
             Summary: information on this topic is available from several sources."
        );

        Ok(SearchResult {
            query: query.to_string(),
            text,
        })
    }
}
