use std::time::Instant;

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse,
    FinishReason,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::ask::config::AskConfig;
use crate::ask::msg::{Msg, Role};
use crate::ask::request::{AskOptions, AskRequest};
use crate::ask::response::{AskResponse, Usage};
use crate::client::{ChatBackend, RemoteChat, SessionSettings};
use crate::error::AiError;
use crate::util::get_http_client;

/// Backend for any OpenAI-compatible chat-completions endpoint.
pub struct OpenAiCompatBackend {
    config: AskConfig,
    client: Client<OpenAIConfig>,
}

impl OpenAiCompatBackend {
    pub fn new(config: AskConfig) -> Result<Self, AiError> {
        let client = Self::get_client(&config)?;
        Ok(Self { config, client })
    }

    pub fn get_client(config: &AskConfig) -> Result<Client<OpenAIConfig>, AiError> {
        let http_client = get_http_client(config)?;
        let oai_cfg = OpenAIConfig::new()
            .with_api_base(config.url.clone())
            .with_api_key(config.api_key.clone());
        Ok(Client::with_config(oai_cfg).with_http_client(http_client))
    }
}

impl ChatBackend for OpenAiCompatBackend {
    fn create_session(&self, settings: &SessionSettings) -> Result<Box<dyn RemoteChat>, AiError> {
        tracing::debug!(
            provider = %self.config.api,
            model = %self.config.model,
            temperature = settings.temperature,
            "creating remote chat"
        );
        Ok(Box::new(OpenAiChat {
            client: self.client.clone(),
            model: self.config.model.clone(),
            settings: settings.clone(),
            history: Vec::new(),
        }))
    }

    fn provider_name(&self) -> &str {
        self.config.api.as_str()
    }
}

/// Conversation handle; history only grows on a successful, non-blank turn.
pub struct OpenAiChat {
    client: Client<OpenAIConfig>,
    model: String,
    settings: SessionSettings,
    history: Vec<Msg>,
}

impl OpenAiChat {
    pub fn history(&self) -> &[Msg] {
        &self.history
    }

    /// Records a finished exchange; blank replies are not worth replaying.
    fn commit_turn(&mut self, text: &str, response: &AskResponse) {
        if !response.is_blank() {
            self.history.push(Msg::user(text));
            self.history.push(Msg::assistant(response.text.clone()));
        }
    }

    fn next_request(&self, text: &str) -> AskRequest {
        let mut messages = self.history.clone();
        messages.push(Msg::user(text));
        AskRequest {
            system: Some(self.settings.system_instruction.clone()),
            messages,
            options: AskOptions {
                temperature: Some(self.settings.temperature),
                max_output_tokens: self.settings.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl RemoteChat for OpenAiChat {
    async fn send(&mut self, text: &str) -> Result<AskResponse, AiError> {
        let req = build_openai_request(&self.model, &self.next_request(text))?;

        let started = Instant::now();
        let resp = self.client.chat().create(req).await.map_err(map_oai_err)?;
        let latency_ms = started.elapsed().as_millis();

        let response = into_ask_response(resp, latency_ms)?;
        self.commit_turn(text, &response);
        Ok(response)
    }
}

fn into_ask_response(
    resp: CreateChatCompletionResponse,
    latency_ms: u128,
) -> Result<AskResponse, AiError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AiError::Malformed("response had no choices".to_string()))?;

    let finish_reason = choice
        .finish_reason
        .as_ref()
        .map(finish_reason_str)
        .unwrap_or("stop")
        .to_string();

    if finish_reason == "content_filter" {
        return Err(AiError::ContentFilter);
    }

    let usage = resp.usage.as_ref().map(|u| Usage {
        prompt_tokens: Some(u.prompt_tokens),
        completion_tokens: Some(u.completion_tokens),
        total_tokens: Some(u.total_tokens),
    });

    Ok(AskResponse {
        text: choice.message.content.unwrap_or_default(),
        finish_reason,
        usage,
        latency_ms,
    })
}

fn finish_reason_str(fr: &FinishReason) -> &'static str {
    match fr {
        FinishReason::Stop => "stop",
        FinishReason::Length => "length",
        FinishReason::ToolCalls => "tool_call",
        FinishReason::ContentFilter => "content_filter",
        FinishReason::FunctionCall => "function_call",
    }
}

fn map_oai_err(e: async_openai::error::OpenAIError) -> AiError {
    use async_openai::error::OpenAIError as E;
    match e {
        E::ApiError(err) => {
            if let Some(code) = &err.code {
                let s = code.to_string();
                if s.contains("401") || s.contains("403") { return AiError::Auth; }
                if s.contains("429") { return AiError::RateLimited; }
            }
            AiError::Provider(err.message)
        }
        E::JSONDeserialize(err) => AiError::Malformed(err.to_string()),
        E::Reqwest(e2) => {
            if e2.is_timeout() { AiError::Timeout } else { AiError::Http(e2) }
        }
        other => AiError::Provider(other.to_string()),
    }
}

fn build_openai_request(
    model: &str,
    request: &AskRequest,
) -> Result<CreateChatCompletionRequest, AiError> {
    let mut oa_msgs: Vec<ChatCompletionRequestMessage> =
        Vec::with_capacity(request.messages.len() + 1);

    if let Some(sys) = &request.system {
        oa_msgs.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(sys.as_str())
                .build()
                .map_err(|e| AiError::Provider(e.to_string()))?
                .into(),
        );
    }

    for m in &request.messages {
        let msg: ChatCompletionRequestMessage = match m.role {
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(m.content.as_str())
                .build()
                .map_err(|e| AiError::Provider(e.to_string()))?
                .into(),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(m.content.clone())
                .build()
                .map_err(|e| AiError::Provider(e.to_string()))?
                .into(),
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(m.content.as_str())
                .build()
                .map_err(|e| AiError::Provider(e.to_string()))?
                .into(),
        };
        oa_msgs.push(msg);
    }

    let mut builder = CreateChatCompletionRequestArgs::default();
    builder.model(model).messages(oa_msgs);

    if let Some(t) = request.options.temperature {
        builder.temperature(t);
    }
    if let Some(mx) = request.options.max_output_tokens {
        builder.max_tokens(mx);
    }

    builder.build().map_err(|e| AiError::Provider(e.to_string()))
}
