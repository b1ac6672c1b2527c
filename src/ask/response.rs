use serde::{Deserialize, Serialize};

/// Provider-agnostic response the session relies on.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub text: String,                // may be empty; the session substitutes a fallback
    pub finish_reason: String,       // normalized: "stop" | "length" | "content_filter" | ...
    #[serde(default)]
    pub usage: Option<Usage>,
    pub latency_ms: u128,            // measured around the provider call
}

impl AskResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: "stop".to_string(),
            ..Default::default()
        }
    }

    /// True when the provider answered but gave nothing a child could read.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Normalized usage counters (best-effort; some providers may omit).
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}
