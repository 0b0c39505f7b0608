use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const WELCOME_TEXT: &str = "Hello! I'm here to help you analyze the data. You can ask me about trends, patterns, specific categories, or any insights you'd like to explore.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub is_from_user: bool,
    pub sent_at: DateTime<Utc>,
}

/// Append-only message history, opened with the assistant's welcome message.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
        };
        session.push(WELCOME_TEXT, false);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn push_user(&mut self, text: &str) -> ChatMessage {
        self.push(text, true)
    }

    pub fn push_assistant(&mut self, text: &str) -> ChatMessage {
        self.push(text, false)
    }

    fn push(&mut self, text: &str, is_from_user: bool) -> ChatMessage {
        let message = ChatMessage {
            id: self.messages.len() as u64 + 1,
            text: text.to_string(),
            is_from_user,
            sent_at: Utc::now(),
        };
        self.messages.push(message.clone());
        message
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
