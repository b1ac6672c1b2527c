use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("http: {0}")] Http(#[from] reqwest::Error),
    #[error("provider: {0}")] Provider(String),
    #[error("malformed response: {0}")] Malformed(String),
    #[error("authentication rejected by provider")]
    Auth,
    #[error("rate limited by provider")]
    RateLimited,
    #[error("request timed out")]
    Timeout,
    #[error("response blocked by content filter")]
    ContentFilter,
    #[error("config: {0}")] Config(#[from] ConfigError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing API key (set SPARKY_API_KEY, GEMINI_API_KEY or API_KEY)")]
    MissingApiKey,
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_ai_error() {
        let err: AiError = ConfigError::MissingApiKey.into();
        assert!(matches!(err, AiError::Config(ConfigError::MissingApiKey)));
        assert!(err.to_string().contains("SPARKY_API_KEY"));
    }

    #[test]
    fn invalid_value_names_the_key() {
        let err = ConfigError::InvalidValue { key: "SPARKY_TEMPERATURE", value: "hot".into() };
        assert_eq!(err.to_string(), "invalid value for SPARKY_TEMPERATURE: hot");
    }
}
