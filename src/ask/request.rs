use serde::{Deserialize, Serialize};

use crate::ask::msg::Msg;

/// Per-call generation knobs (leave unset to use server defaults).
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AskOptions {
    pub temperature: Option<f32>,       // e.g., Some(0.8)
    pub max_output_tokens: Option<u32>, // e.g., Some(512)
}

/// The request shape handed to a provider adapter.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    #[serde(default)]
    pub system: Option<String>, // persona / system instruction
    pub messages: Vec<Msg>,     // full history, newest last
    #[serde(default)]
    pub options: AskOptions,
}
