// src/config.rs
//! Startup config for sparky_chat.
//! Load once at startup from the environment; the API key is required.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ask::config::AskConfig;
use crate::client::{ProviderAPI, SessionSettings};
use crate::error::ConfigError;
use crate::persona::SYSTEM_INSTRUCTION;

const API_KEY_VARS: [&str; 3] = ["SPARKY_API_KEY", "GEMINI_API_KEY", "API_KEY"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Which OpenAI-compatible surface to talk to.
    pub provider: ProviderAPI,
    pub model: String,
    /// Overrides the provider's default base URL.
    pub base_url: Option<String>,

    /// Credential for the remote model. Never hard-coded.
    pub api_key: String,

    pub temperature: f32,
    pub max_output_tokens: Option<u32>,

    /// Upper bound on a single remote exchange.
    pub request_timeout: Duration,
}

impl ChatConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderAPI::Gemini,
            model: "gemini-3-flash-preview".to_string(),
            base_url: None,
            api_key: api_key.into(),
            temperature: 0.8,
            max_output_tokens: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup, then validate.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|&k| lookup(k))
            .find(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut cfg = Self::new(api_key.trim());

        if let Some(p) = lookup("SPARKY_PROVIDER") {
            cfg.provider = ProviderAPI::parse(&p).ok_or(ConfigError::UnknownProvider(p))?;
            if cfg.provider == ProviderAPI::OpenAI {
                cfg.model = "gpt-4.1-mini".to_string();
            }
        }
        if let Some(m) = lookup("SPARKY_MODEL").filter(|m| !m.trim().is_empty()) {
            cfg.model = m;
        }
        cfg.base_url = lookup("SPARKY_BASE_URL").filter(|u| !u.trim().is_empty());

        if let Some(t) = lookup("SPARKY_TEMPERATURE") {
            cfg.temperature = parse_value("SPARKY_TEMPERATURE", &t)?;
        }
        if let Some(mx) = lookup("SPARKY_MAX_OUTPUT_TOKENS") {
            cfg.max_output_tokens = Some(parse_value("SPARKY_MAX_OUTPUT_TOKENS", &mx)?);
        }
        if let Some(secs) = lookup("SPARKY_TIMEOUT_SECS") {
            cfg.request_timeout = Duration::from_secs(parse_value("SPARKY_TIMEOUT_SECS", &secs)?);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                key: "SPARKY_TEMPERATURE",
                value: self.temperature.to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "SPARKY_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn ask_config(&self) -> AskConfig {
        AskConfig::new(
            self.model.clone(),
            self.provider,
            self.api_key.clone(),
            self.base_url.clone(),
            Some(self.request_timeout),
        )
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
