use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use paperdesk_client::Backend;
use paperdesk_core::request::RequestState;

use crate::lifecycle::{lock, Lifecycle, Outcome};

pub const GREETING: &str =
    "Hi! I am your research assistant. Ask me any academic or LaTeX-related question.";
pub const NO_ANSWER: &str = "Sorry, I could not answer that.";
pub const UNREACHABLE: &str = "Error: Could not reach the chatbot.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Research assistant chat. Failures never raise notices; they become
/// assistant messages in the transcript.
pub struct ChatTool {
    backend: Arc<dyn Backend>,
    transcript: Mutex<Vec<ChatMessage>>,
    exchange: Lifecycle<String>,
}

impl ChatTool {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            transcript: Mutex::new(vec![ChatMessage::new(Sender::Assistant, GREETING)]),
            exchange: Lifecycle::new(),
        }
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        lock(&self.transcript).clone()
    }

    pub fn state(&self) -> RequestState {
        self.exchange.state()
    }

    /// Send a message and append the reply (or a fallback) to the transcript.
    pub async fn send(&self, message: &str) -> Outcome {
        if message.trim().is_empty() || !self.exchange.try_begin() {
            return Outcome::Ignored;
        }
        lock(&self.transcript).push(ChatMessage::new(Sender::User, message));

        let (reply, outcome) = match self.backend.chat(message).await {
            Ok(Some(reply)) => {
                debug!(chars = reply.len(), "Chat reply received");
                self.exchange.succeed(reply.clone());
                (reply, Outcome::Succeeded)
            }
            Ok(None) => {
                self.exchange.succeed(NO_ANSWER.to_string());
                (NO_ANSWER.to_string(), Outcome::Succeeded)
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                self.exchange.fail(e.user_message());
                (UNREACHABLE.to_string(), Outcome::Failed)
            }
        };

        lock(&self.transcript).push(ChatMessage::new(Sender::Assistant, reply));
        outcome
    }

    /// Text of the most recent assistant message.
    pub fn last_reply(&self) -> Option<String> {
        lock(&self.transcript)
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Assistant)
            .map(|m| m.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, Reply};
    use paperdesk_core::request::Status;
    use tokio::sync::Semaphore;

    #[tokio::test]
    async fn transcript_starts_with_greeting() {
        let tool = ChatTool::new(Arc::new(FakeBackend::new()));
        let transcript = tool.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].sender, Sender::Assistant);
        assert_eq!(transcript[0].text, GREETING);
    }

    #[tokio::test]
    async fn blank_message_is_a_no_op() {
        let backend = Arc::new(FakeBackend::new());
        let tool = ChatTool::new(backend.clone());
        assert_eq!(tool.send("  ").await, Outcome::Ignored);
        assert_eq!(backend.call_count(), 0);
        assert_eq!(tool.transcript().len(), 1);
    }

    #[tokio::test]
    async fn reply_and_fallbacks_are_appended() {
        let backend = Arc::new(FakeBackend::new());
        let tool = ChatTool::new(backend.clone());

        assert_eq!(tool.send("What is BibTeX?").await, Outcome::Succeeded);
        assert_eq!(tool.last_reply().as_deref(), Some("Hello!"));

        backend.set_chat(Reply::Ok(None));
        assert_eq!(tool.send("And biber?").await, Outcome::Succeeded);
        assert_eq!(tool.last_reply().as_deref(), Some(NO_ANSWER));

        backend.set_chat(Reply::Transport("connection refused".into()));
        assert_eq!(tool.send("Hello?").await, Outcome::Failed);
        assert_eq!(tool.last_reply().as_deref(), Some(UNREACHABLE));

        let senders: Vec<_> = tool.transcript().iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![
                Sender::Assistant,
                Sender::User,
                Sender::Assistant,
                Sender::User,
                Sender::Assistant,
                Sender::User,
                Sender::Assistant
            ]
        );
    }

    #[tokio::test]
    async fn message_while_waiting_is_dropped() {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Arc::new(FakeBackend::new().gated(gate.clone()));
        let tool = Arc::new(ChatTool::new(backend.clone()));

        let first = tokio::spawn({
            let tool = tool.clone();
            async move { tool.send("What is BibTeX?").await }
        });
        backend.started.notified().await;
        assert_eq!(tool.state().status, Status::Busy);

        assert_eq!(tool.send("Are you there?").await, Outcome::Ignored);
        assert_eq!(backend.call_count(), 1);
        assert_eq!(tool.transcript().len(), 2);

        gate.add_permits(1);
        assert_eq!(first.await.unwrap(), Outcome::Succeeded);
        assert_eq!(backend.calls(), vec!["chat:What is BibTeX?".to_string()]);
        assert_eq!(tool.transcript().len(), 3);
    }
}
