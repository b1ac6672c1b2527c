//! Remote model seam: a backend mints chat handles, a handle carries one
//! conversation's context and answers one message at a time.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ask::response::AskResponse;
use crate::error::AiError;

pub mod openai;

pub use openai::{OpenAiCompatBackend, OpenAiChat};

/// Provider selector (keep ids stable for config files and env vars).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderAPI {
    OpenAI,
    Gemini, // via Google's OpenAI-compatible endpoint
}

impl ProviderAPI {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderAPI::OpenAI => "openai",
            ProviderAPI::Gemini => "gemini",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(ProviderAPI::OpenAI),
            "gemini" | "google" => Some(ProviderAPI::Gemini),
            _ => None,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderAPI::OpenAI => "https://api.openai.com/v1",
            ProviderAPI::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }
}

impl fmt::Display for ProviderAPI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed parameters a chat handle is created with.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettings {
    pub system_instruction: String,
    pub temperature: f32,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

/// Creates fresh conversational contexts on the remote model.
///
/// Creation must not touch the network; reachability problems surface on
/// the first `send`.
pub trait ChatBackend: Send + Sync {
    fn create_session(&self, settings: &SessionSettings) -> Result<Box<dyn RemoteChat>, AiError>;

    /// Provider name for logging.
    fn provider_name(&self) -> &str;
}

/// One remote conversation. Implementations keep the running history and
/// replay it with every request.
#[async_trait]
pub trait RemoteChat: Send {
    async fn send(&mut self, text: &str) -> Result<AskResponse, AiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parse_is_case_insensitive() {
        assert_eq!(ProviderAPI::parse("Gemini"), Some(ProviderAPI::Gemini));
        assert_eq!(ProviderAPI::parse(" OPENAI "), Some(ProviderAPI::OpenAI));
        assert_eq!(ProviderAPI::parse("anthropic"), None);
    }

    #[test]
    fn provider_display_matches_parse() {
        for p in [ProviderAPI::OpenAI, ProviderAPI::Gemini] {
            assert_eq!(ProviderAPI::parse(&p.to_string()), Some(p));
        }
    }
}
