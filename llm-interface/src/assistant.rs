//! Sequential request/response cycle of the chat assistant.
//!
//! A submission appends the user's message before anything goes on the wire,
//! flips the assistant into [`ChatState::Sending`] and blocks further
//! submissions until exactly one assistant message has been appended. Every
//! failure becomes the same apology message; details only reach the logs.

use crate::client::{ChatReply, ChatRequest, ChatTransport, HttpChatTransport};
use crate::session::{ChatMessage, ChatSession};
use listenboard_core::{ChatConfig, CoreError, ErrorExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const APOLOGY_TEXT: &str =
    "Sorry, I'm having trouble connecting to the AI service. Please try again later.";
pub const MISSING_REPLY_TEXT: &str = "I couldn't generate a response. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    Sending,
}

/// Result of the synchronous half of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Ignored,
    Busy,
    Ready(ChatRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input; nothing was appended.
    Ignored,
    /// A request is already outstanding; nothing was appended.
    Busy,
    Answered(ChatMessage),
    Failed(ChatMessage),
}

pub struct ChatAssistant {
    transport: Arc<dyn ChatTransport>,
    task_label: String,
    request_timeout: Duration,
    session: Mutex<ChatSession>,
    sending: AtomicBool,
}

impl ChatAssistant {
    pub fn new(transport: Arc<dyn ChatTransport>, config: &ChatConfig) -> Self {
        Self {
            transport,
            task_label: config.task_label.clone(),
            request_timeout: config.request_timeout(),
            session: Mutex::new(ChatSession::new()),
            sending: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Result<Self, CoreError> {
        let transport = HttpChatTransport::new(config)?;
        info!("Chat assistant using endpoint {}", transport.endpoint());
        Ok(Self::new(Arc::new(transport), config))
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn session(&self) -> MutexGuard<'_, ChatSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ChatState {
        if self.sending.load(Ordering::Acquire) {
            ChatState::Sending
        } else {
            ChatState::Idle
        }
    }

    pub fn is_sending(&self) -> bool {
        self.state() == ChatState::Sending
    }

    pub fn session_id(&self) -> Uuid {
        self.session().id()
    }

    /// Snapshot of the message history.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.session().messages().to_vec()
    }

    /// Validates the input, takes the sending slot and records the user's
    /// message. The returned request must be passed to [`Self::finish`] via
    /// [`Self::dispatch`], or the assistant stays in `Sending`.
    pub fn begin(&self, text: &str) -> Submission {
        if text.trim().is_empty() {
            return Submission::Ignored;
        }

        if self
            .sending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Chat submission rejected, a request is outstanding");
            return Submission::Busy;
        }

        let mut session = self.session();
        let message = session.push_user(text);
        info!(
            "Chat session {} sending message {} ({} chars)",
            session.id(),
            message.id,
            text.len()
        );
        Submission::Ready(ChatRequest::new(text, &self.task_label))
    }

    /// Sends one request, bounded by the configured timeout.
    pub async fn dispatch(&self, request: ChatRequest) -> Result<ChatReply, CoreError> {
        match tokio::time::timeout(self.request_timeout, self.transport.send(&request)).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout {
                seconds: self.request_timeout.as_secs(),
            }),
        }
    }

    /// Appends the assistant's message for `result` and returns to `Idle`.
    pub fn finish(&self, result: Result<ChatReply, CoreError>) -> SubmitOutcome {
        let outcome = {
            let mut session = self.session();
            match result {
                Ok(reply) => {
                    let text = reply.text().unwrap_or_else(|| {
                        warn!("Chat reply had neither response nor content");
                        MISSING_REPLY_TEXT
                    });
                    SubmitOutcome::Answered(session.push_assistant(text))
                }
                Err(e) => {
                    e.log_warn();
                    warn!(
                        "Chat session {} request failed [{}], replying with apology",
                        session.id(),
                        e.error_code()
                    );
                    SubmitOutcome::Failed(session.push_assistant(APOLOGY_TEXT))
                }
            }
        };
        self.sending.store(false, Ordering::Release);
        outcome
    }

    /// Full cycle: begin, one request, finish. No retries.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        match self.begin(text) {
            Submission::Ignored => SubmitOutcome::Ignored,
            Submission::Busy => SubmitOutcome::Busy,
            Submission::Ready(request) => {
                let result = self.dispatch(request).await;
                self.finish(result)
            }
        }
    }
}

impl std::fmt::Debug for ChatAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAssistant")
            .field("task_label", &self.task_label)
            .field("request_timeout", &self.request_timeout)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::WELCOME_TEXT;
    use async_trait::async_trait;
    use listenboard_core::ChatError;
    use tokio::sync::Notify;

    struct FixedReply(ChatReply);

    #[async_trait]
    impl ChatTransport for FixedReply {
        async fn send(&self, _request: &ChatRequest) -> Result<ChatReply, CoreError> {
            Ok(self.0.clone())
        }
    }

    struct Failing(fn() -> CoreError);

    #[async_trait]
    impl ChatTransport for Failing {
        async fn send(&self, _request: &ChatRequest) -> Result<ChatReply, CoreError> {
            Err((self.0)())
        }
    }

    struct Gated {
        release: Notify,
    }

    #[async_trait]
    impl ChatTransport for Gated {
        async fn send(&self, request: &ChatRequest) -> Result<ChatReply, CoreError> {
            self.release.notified().await;
            Ok(ChatReply {
                response: Some(format!("re: {}", request.user_prompt)),
                content: None,
            })
        }
    }

    struct Hung;

    #[async_trait]
    impl ChatTransport for Hung {
        async fn send(&self, _request: &ChatRequest) -> Result<ChatReply, CoreError> {
            std::future::pending().await
        }
    }

    fn assistant(transport: impl ChatTransport + 'static) -> ChatAssistant {
        ChatAssistant::new(Arc::new(transport), &ChatConfig::default())
    }

    fn texts(assistant: &ChatAssistant) -> Vec<(bool, String)> {
        assistant
            .messages()
            .into_iter()
            .map(|m| (m.is_from_user, m.text))
            .collect()
    }

    #[tokio::test]
    async fn test_submit_success() {
        let assistant = assistant(FixedReply(ChatReply {
            response: Some("X".to_string()),
            content: None,
        }));

        let outcome = assistant.submit("hi").await;
        assert!(matches!(outcome, SubmitOutcome::Answered(ref m) if m.text == "X"));
        assert_eq!(
            texts(&assistant),
            vec![
                (false, WELCOME_TEXT.to_string()),
                (true, "hi".to_string()),
                (false, "X".to_string())
            ]
        );
        assert_eq!(assistant.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn test_missing_reply_field() {
        let assistant = assistant(FixedReply(ChatReply::default()));
        let outcome = assistant.submit("hi").await;
        assert!(matches!(outcome, SubmitOutcome::Answered(ref m) if m.text == MISSING_REPLY_TEXT));
    }

    #[tokio::test]
    async fn test_every_failure_collapses_to_apology() {
        let failures: Vec<fn() -> CoreError> = vec![
            || ChatError::ServerError { status_code: 500 }.into(),
            || ChatError::ServerError { status_code: 404 }.into(),
            || {
                ChatError::InvalidResponseFormat {
                    details: "expected value at line 1".to_string(),
                }
                .into()
            },
            || {
                ChatError::EndpointUnavailable {
                    endpoint: "http://localhost:3001/ai/chat".to_string(),
                }
                .into()
            },
            || CoreError::Timeout { seconds: 30 },
        ];

        for failure in failures {
            let assistant = assistant(Failing(failure));
            let outcome = assistant.submit("hi").await;
            assert!(matches!(outcome, SubmitOutcome::Failed(ref m) if m.text == APOLOGY_TEXT));
            let history = texts(&assistant);
            assert_eq!(history.len(), 3);
            assert_eq!(history[1], (true, "hi".to_string()));
            assert_eq!(history[2], (false, APOLOGY_TEXT.to_string()));
            assert!(!assistant.is_sending());
        }
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let assistant = assistant(FixedReply(ChatReply::default()));
        let outcome = tokio_test::block_on(assistant.submit("   \n"));
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert_eq!(assistant.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_second_submit_while_sending_is_rejected() {
        let transport = Arc::new(Gated {
            release: Notify::new(),
        });
        let assistant = Arc::new(ChatAssistant::new(
            transport.clone(),
            &ChatConfig::default(),
        ));

        let first = {
            let assistant = Arc::clone(&assistant);
            tokio::spawn(async move { assistant.submit("first").await })
        };
        while !assistant.is_sending() {
            tokio::task::yield_now().await;
        }

        assert_eq!(assistant.submit("second").await, SubmitOutcome::Busy);
        assert_eq!(assistant.messages().len(), 2);

        transport.release.notify_one();
        let outcome = first.await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Answered(ref m) if m.text == "re: first"));
        assert_eq!(assistant.state(), ChatState::Idle);
        assert_eq!(assistant.messages().len(), 3);

        // Idle again, so the next submission goes through.
        assert!(matches!(assistant.begin("third"), Submission::Ready(_)));
    }

    #[tokio::test]
    async fn test_begin_records_user_message_before_sending() {
        let assistant = assistant(FixedReply(ChatReply::default()));
        let Submission::Ready(request) = assistant.begin("trends?") else {
            panic!("Expected a ready submission");
        };
        assert_eq!(request.user_prompt, "trends?");
        assert_eq!(request.user_task, "data_analysis");
        assert!(request.filters.is_none());
        assert!(assistant.is_sending());
        assert_eq!(assistant.messages().last().unwrap().text, "trends?");

        assistant.finish(Err(CoreError::Timeout { seconds: 30 }));
        assert!(!assistant.is_sending());
    }

    #[test]
    fn test_prompt_is_sent_verbatim() {
        let assistant = assistant(FixedReply(ChatReply::default()));
        let raw = "  line one\n  line two  ";
        let Submission::Ready(request) = assistant.begin(raw) else {
            panic!("Expected a ready submission");
        };
        assert_eq!(request.user_prompt, raw);
        assert_eq!(assistant.messages().last().unwrap().text, raw);
        assistant.finish(Ok(ChatReply::default()));
    }

    #[tokio::test]
    async fn test_hung_request_times_out() {
        let assistant = assistant(Hung).with_request_timeout(Duration::from_millis(50));
        let outcome = assistant.submit("hello?").await;
        assert!(matches!(outcome, SubmitOutcome::Failed(ref m) if m.text == APOLOGY_TEXT));
        assert_eq!(assistant.state(), ChatState::Idle);
    }
}
