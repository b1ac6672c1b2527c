pub mod ask;
pub mod client;
pub mod config;
pub mod error;
pub mod persona;
pub mod session;
pub mod telemetry;
pub mod types;
pub mod util;

pub use ask::response::AskResponse;
pub use client::{ChatBackend, OpenAiCompatBackend, ProviderAPI, RemoteChat, SessionSettings};
pub use config::ChatConfig;
pub use error::{AiError, ConfigError};
pub use persona::{
    QuickAction, EMPTY_RESPONSE_FALLBACK, FAILURE_FALLBACK, FRESH_START_GREETING,
    SYSTEM_INSTRUCTION, WELCOME_GREETING,
};
pub use session::ChatSession;
pub use types::{Intent, Message, MessageId, Role, SendOutcome, SessionSnapshot};
