//! Append-only conversation transcript.

use super::message::Message;

/// The visible message history of one orchestrator.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message; messages are never reordered or edited.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Get all messages.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_arrival_order() {
        let mut conversation = Conversation::new();
        assert!(conversation.is_empty());
        conversation.push(Message::user("one"));
        conversation.push(Message::assistant("two"));

        assert_eq!(conversation.len(), 2);
        let texts: Vec<_> = conversation.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["one", "two"]);
    }
}
