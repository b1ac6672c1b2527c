use crate::ask::config::AskConfig;
use crate::error::AiError;

pub const USER_AGENT: &str = concat!("sparky-chat/", env!("CARGO_PKG_VERSION"));

pub fn get_http_client(config: &AskConfig) -> Result<reqwest::Client, AiError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.request_timeout)
        .build()
        .map_err(AiError::Http)
}
