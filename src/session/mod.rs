//! Conversation session manager.
//!
//! Owns the transcript, the busy flag and the remote chat handle. At most
//! one remote request is outstanding per session; remote failures become
//! fixed fallback messages and never escape as errors.

mod transcript;

use transcript::Transcript;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::ask::response::AskResponse;
use crate::client::{ChatBackend, OpenAiCompatBackend, RemoteChat, SessionSettings};
use crate::config::ChatConfig;
use crate::error::AiError;
use crate::persona::{
    QuickAction, EMPTY_RESPONSE_FALLBACK, FAILURE_FALLBACK, FRESH_START_GREETING,
    WELCOME_GREETING,
};
use crate::types::{Intent, Message, Role, SendOutcome, SessionSnapshot};

type SharedChat = Arc<tokio::sync::Mutex<Box<dyn RemoteChat>>>;

struct SessionState {
    transcript: Transcript,
    busy: bool,
    /// Bumped on every reset; replies tagged with an older value are stale.
    generation: u64,
    handle: Option<SharedChat>,
}

pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    settings: SessionSettings,
    request_timeout: Duration,
    state: Mutex<SessionState>,
}

impl ChatSession {
    /// Creates the session with a fresh remote handle and the welcome greeting.
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        settings: SessionSettings,
        request_timeout: Duration,
    ) -> Result<Self, AiError> {
        let handle = backend.create_session(&settings)?;
        tracing::info!(provider = backend.provider_name(), "chat session started");
        Ok(Self {
            backend,
            settings,
            request_timeout,
            state: Mutex::new(SessionState {
                transcript: Transcript::seeded(WELCOME_GREETING),
                busy: false,
                generation: 0,
                handle: Some(Arc::new(tokio::sync::Mutex::new(handle))),
            }),
        })
    }

    /// Validates the config and wires up the OpenAI-compatible backend.
    pub fn from_config(config: &ChatConfig) -> Result<Self, AiError> {
        config.validate()?;
        let backend = OpenAiCompatBackend::new(config.ask_config())?;
        Self::new(Arc::new(backend), config.session_settings(), config.request_timeout)
    }

    pub async fn send_user_text(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            tracing::debug!("ignoring blank input");
            return SendOutcome::Ignored;
        }

        let (generation, handle) = {
            let mut st = self.state();
            if st.busy {
                tracing::warn!("send rejected: a reply is still pending");
                return SendOutcome::Busy;
            }
            st.transcript.push(Role::User, text);
            st.busy = true;
            let handle = match st.handle.clone() {
                Some(h) => Ok(h),
                None => self.create_handle().map(|h| {
                    st.handle = Some(h.clone());
                    h
                }),
            };
            (st.generation, handle)
        };

        let mut guard = PendingReply { session: self, generation, settled: false };

        tracing::info!(generation, chars = text.chars().count(), "sending message to model");
        let result = match handle {
            Ok(h) => self.exchange(&h, text).await,
            Err(e) => Err(e),
        };
        let reply = reply_text(result);

        guard.settled = true;
        let mut st = self.state();
        if st.generation != generation {
            tracing::warn!(
                generation,
                current = st.generation,
                "discarding reply for a conversation that was reset"
            );
            return SendOutcome::Discarded;
        }
        let msg = st.transcript.push(Role::Model, reply);
        st.busy = false;
        SendOutcome::Replied(msg)
    }

    pub async fn quick_action(&self, action: QuickAction) -> SendOutcome {
        self.send_user_text(action.prompt()).await
    }

    /// Starts a new conversation: fresh greeting, fresh remote context.
    ///
    /// Any reply still in flight for the old conversation is dropped when it
    /// lands. If the new handle can't be created the error is returned and
    /// the next send retries creation.
    pub fn reset(&self) -> Result<(), AiError> {
        let fresh = self.create_handle();
        let mut st = self.state();
        st.generation += 1;
        st.busy = false;
        st.transcript.reseed(FRESH_START_GREETING);
        match fresh {
            Ok(h) => {
                st.handle = Some(h);
                tracing::info!(generation = st.generation, "conversation reset");
                Ok(())
            }
            Err(e) => {
                st.handle = None;
                tracing::error!(error = %e, "could not create a remote chat after reset");
                Err(e)
            }
        }
    }

    /// Routes a presentation intent. Resets yield `None`.
    pub async fn dispatch(&self, intent: Intent) -> Result<Option<SendOutcome>, AiError> {
        match intent {
            Intent::SendText(text) => Ok(Some(self.send_user_text(&text).await)),
            Intent::SendQuickAction(action) => Ok(Some(self.quick_action(action).await)),
            Intent::ResetConversation => self.reset().map(|_| None),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let st = self.state();
        SessionSnapshot {
            transcript: st.transcript.messages().to_vec(),
            is_awaiting_response: st.busy,
        }
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.state().transcript.messages().to_vec()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.state().busy
    }

    fn create_handle(&self) -> Result<SharedChat, AiError> {
        let chat = self.backend.create_session(&self.settings)?;
        Ok(Arc::new(tokio::sync::Mutex::new(chat)))
    }

    async fn exchange(&self, handle: &SharedChat, text: &str) -> Result<AskResponse, AiError> {
        let mut chat = handle.lock().await;
        match tokio::time::timeout(self.request_timeout, chat.send(text)).await {
            Ok(result) => result,
            Err(_) => Err(AiError::Timeout),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn reply_text(result: Result<AskResponse, AiError>) -> String {
    match result {
        Ok(resp) if !resp.is_blank() => {
            tracing::debug!(
                latency_ms = resp.latency_ms as u64,
                finish_reason = %resp.finish_reason,
                "model replied"
            );
            resp.text
        }
        Ok(resp) => {
            tracing::warn!(finish_reason = %resp.finish_reason, "model returned an empty reply");
            EMPTY_RESPONSE_FALLBACK.to_string()
        }
        Err(err) => {
            tracing::error!(error = %err, "model request failed");
            FAILURE_FALLBACK.to_string()
        }
    }
}

/// Keeps the two-entries-per-send rule and clears `busy` if the caller drops
/// a send before it settles.
struct PendingReply<'a> {
    session: &'a ChatSession,
    generation: u64,
    settled: bool,
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut st = self.session.state();
        if st.generation == self.generation && st.busy {
            tracing::warn!(generation = self.generation, "send abandoned before the model replied");
            st.transcript.push(Role::Model, FAILURE_FALLBACK);
            st.busy = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoChat;

    #[async_trait]
    impl RemoteChat for EchoChat {
        async fn send(&mut self, text: &str) -> Result<AskResponse, AiError> {
            Ok(AskResponse::text(format!("echo: {text}")))
        }
    }

    /// Fails the first `failures` creations, then hands out echo chats.
    struct FlakyBackend {
        failures: usize,
        created: AtomicUsize,
    }

    impl ChatBackend for FlakyBackend {
        fn create_session(&self, _: &SessionSettings) -> Result<Box<dyn RemoteChat>, AiError> {
            let n = self.created.fetch_add(1, Ordering::SeqCst);
            if n > 0 && n <= self.failures {
                return Err(AiError::Provider("service unavailable".into()));
            }
            Ok(Box::new(EchoChat))
        }

        fn provider_name(&self) -> &str {
            "flaky"
        }
    }

    fn settings() -> SessionSettings {
        SessionSettings {
            system_instruction: "be kind".into(),
            temperature: 0.8,
            max_output_tokens: None,
        }
    }

    #[test]
    fn new_session_is_idle_with_welcome() {
        let backend = Arc::new(FlakyBackend { failures: 0, created: AtomicUsize::new(0) });
        let session = ChatSession::new(backend, settings(), Duration::from_secs(1)).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.transcript.len(), 1);
        assert_eq!(snap.transcript[0].text, WELCOME_GREETING);
        assert!(!snap.is_awaiting_response);
    }

    #[tokio::test]
    async fn failed_reset_creation_is_returned_and_retried_lazily() {
        // creation #0 succeeds (startup), #1 fails (reset), #2 succeeds (lazy)
        let backend = Arc::new(FlakyBackend { failures: 1, created: AtomicUsize::new(0) });
        let session = ChatSession::new(backend.clone(), settings(), Duration::from_secs(1)).unwrap();

        assert!(session.reset().is_err());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].text, FRESH_START_GREETING);

        let outcome = session.send_user_text("hi").await;
        assert_eq!(outcome.reply().unwrap().text, "echo: hi");
        assert_eq!(backend.created.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn lazy_creation_failure_takes_the_failure_branch() {
        let backend = Arc::new(FlakyBackend { failures: 2, created: AtomicUsize::new(0) });
        let session = ChatSession::new(backend, settings(), Duration::from_secs(1)).unwrap();
        let _ = session.reset();

        let outcome = session.send_user_text("hi").await;
        assert_eq!(outcome.reply().unwrap().text, FAILURE_FALLBACK);
        assert_eq!(session.transcript().len(), 3);
        assert!(!session.is_awaiting_response());
    }

    #[test]
    fn from_config_requires_a_key() {
        let err = ChatSession::from_config(&ChatConfig::new("  ")).err().unwrap();
        assert!(matches!(err, AiError::Config(crate::error::ConfigError::MissingApiKey)));

        let session = ChatSession::from_config(&ChatConfig::new("test-key")).unwrap();
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn reply_text_maps_each_branch() {
        assert_eq!(reply_text(Ok(AskResponse::text("yay"))), "yay");
        assert_eq!(reply_text(Ok(AskResponse::text(""))), EMPTY_RESPONSE_FALLBACK);
        assert_eq!(reply_text(Err(AiError::Timeout)), FAILURE_FALLBACK);
    }

    #[tokio::test]
    async fn dropped_send_still_settles_the_transcript() {
        struct NeverChat;

        #[async_trait]
        impl RemoteChat for NeverChat {
            async fn send(&mut self, _text: &str) -> Result<AskResponse, AiError> {
                std::future::pending().await
            }
        }

        struct NeverBackend;

        impl ChatBackend for NeverBackend {
            fn create_session(&self, _: &SessionSettings) -> Result<Box<dyn RemoteChat>, AiError> {
                Ok(Box::new(NeverChat))
            }

            fn provider_name(&self) -> &str {
                "never"
            }
        }

        let session = ChatSession::new(Arc::new(NeverBackend), settings(), Duration::from_secs(60)).unwrap();
        {
            let fut = session.send_user_text("hello?");
            tokio::pin!(fut);
            let polled = tokio::time::timeout(Duration::from_millis(10), &mut fut).await;
            assert!(polled.is_err());
            assert!(session.is_awaiting_response());
        }

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[2].text, FAILURE_FALLBACK);
        assert!(!session.is_awaiting_response());
    }
}
