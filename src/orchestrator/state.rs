use strum::{Display, EnumString};

use crate::types::Message;

/// Where the current (or most recent) turn is.
///
/// `Completed` and `Failed` are terminal; the orchestrator accepts a new
/// submission from either, so both count as idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TurnState {
    #[default]
    Idle,
    Submitting,
    MemoryLoad,
    SearchCheck,
    SearchFetch,
    ProviderCall,
    MemoryAppend,
    Completed,
    Failed,
}

impl TurnState {
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle | Self::Completed | Self::Failed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Result of a `send_message` call that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Input was empty after trimming; nothing happened.
    Skipped,
    /// Another turn was in flight; the submission was ignored.
    Busy,
    /// The assistant replied.
    Completed(Message),
}

impl TurnOutcome {
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Completed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_idle() {
        assert!(TurnState::Idle.is_idle());
        assert!(TurnState::Completed.is_idle());
        assert!(TurnState::Failed.is_idle());
        assert!(!TurnState::ProviderCall.is_idle());
        assert!(!TurnState::Idle.is_terminal());
    }

    #[test]
    fn state_names_are_snake_case() {
        assert_eq!(TurnState::SearchFetch.to_string(), "search_fetch");
        assert_eq!("memory_append".parse::<TurnState>().unwrap(), TurnState::MemoryAppend);
    }
}
