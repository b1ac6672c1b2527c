use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::client::ProviderAPI;


#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AskConfig {
    pub model: String,
    pub api: ProviderAPI,
    pub url: String,
    pub api_key: String,
    pub request_timeout: Duration,
}

impl AskConfig {
    pub fn new(model: String, api: ProviderAPI, api_key: String, url: Option<String>, request_timeout: Option<Duration>) -> Self {
        let url = url.unwrap_or_else(|| api.default_base_url().to_string());
        let request_timeout = request_timeout.unwrap_or_else(|| Duration::from_secs(30));
        Self {
            model,
            api,
            url,
            api_key,
            request_timeout,
        }
    }

    pub fn default_gemini(api_key: String) -> Self {
        Self::new("gemini-3-flash-preview".to_string(), ProviderAPI::Gemini, api_key, None, None)
    }

    pub fn default_openai(api_key: String) -> Self {
        Self::new("gpt-4.1-mini".to_string(), ProviderAPI::OpenAI, api_key, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_defaults_point_at_openai_compat_surface() {
        let cfg = AskConfig::default_gemini("k".into());
        assert_eq!(cfg.url, "https://generativelanguage.googleapis.com/v1beta/openai");
        assert_eq!(cfg.model, "gemini-3-flash-preview");
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn explicit_url_wins() {
        let cfg = AskConfig::new(
            "m".into(),
            ProviderAPI::OpenAI,
            "k".into(),
            Some("http://localhost:8080/v1".into()),
            Some(Duration::from_secs(5)),
        );
        assert_eq!(cfg.url, "http://localhost:8080/v1");
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
    }
}
