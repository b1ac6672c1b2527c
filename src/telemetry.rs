use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogConfig {
    /// Used when `RUST_LOG` is unset.
    pub default_filter: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_filter: "sparky_chat=info".to_string(),
            json: false,
        }
    }
}

/// Installs the global subscriber once; later calls are no-ops.
pub fn init_tracing(config: &LogConfig) {
    let _ = TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));
        let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
        let result = if config.json {
            tracing::subscriber::set_global_default(builder.json().finish())
        } else {
            tracing::subscriber::set_global_default(builder.finish())
        };
        if result.is_err() {
            tracing::debug!("a global tracing subscriber was already installed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let cfg = LogConfig::default();
        init_tracing(&cfg);
        init_tracing(&cfg);
        assert!(TRACING_INIT.get().is_some());
    }
}
