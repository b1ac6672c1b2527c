// src/types.rs
//! What the session hands to a renderer (messages, snapshots) and what a
//! renderer hands back (intents).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persona::QuickAction;

/// Who wrote a transcript entry.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Per-session counter id; strictly increasing, never reused.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One transcript entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Point-in-time, read-only view for rendering.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub transcript: Vec<Message>,
    pub is_awaiting_response: bool,
}

/// What the presentation layer can ask for.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    SendText(String),
    SendQuickAction(QuickAction),
    ResetConversation,
}

/// Result of a send attempt. Remote failures are not errors here: they end
/// up as a fallback `Replied` message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// A request was already in flight; nothing happened.
    Busy,
    /// User and model entries were appended; carries the model entry.
    Replied(Message),
    /// The conversation was reset while waiting; the reply was dropped.
    Discarded,
}

impl SendOutcome {
    pub fn reply(&self) -> Option<&Message> {
        match self {
            SendOutcome::Replied(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_camel_case_with_lowercase_role() {
        let msg = Message {
            id: MessageId(7),
            role: Role::Model,
            text: "hi".into(),
            timestamp: DateTime::from_timestamp(0, 0).unwrap(),
        };
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["id"], 7);
        assert_eq!(v["role"], "model");
        assert_eq!(v["text"], "hi");
        assert!(v.get("timestamp").is_some());
    }

    #[test]
    fn intent_round_trips_through_json() {
        let json = r#"{"type":"send_quick_action","payload":"fun_fact"}"#;
        let intent: Intent = serde_json::from_str(json).unwrap();
        assert_eq!(intent, Intent::SendQuickAction(QuickAction::FunFact));

        let send = serde_json::to_value(Intent::SendText("hello".into())).unwrap();
        assert_eq!(send["type"], "send_text");
        assert_eq!(send["payload"], "hello");
    }
}
