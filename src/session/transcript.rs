use chrono::Utc;

use crate::types::{Message, MessageId, Role};

/// Append-only message log; the only other mutation is a full reseed.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    pub fn seeded(greeting: &str) -> Self {
        let mut t = Self { messages: Vec::new(), next_id: 1 };
        t.push(Role::Model, greeting);
        t
    }

    pub fn push(&mut self, role: Role, text: impl Into<String>) -> Message {
        let msg = Message {
            id: MessageId(self.next_id),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(msg.clone());
        msg
    }

    /// Drops every entry and starts over with one greeting. Ids keep counting.
    pub fn reseed(&mut self, greeting: &str) {
        self.messages.clear();
        self.push(Role::Model, greeting);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}
