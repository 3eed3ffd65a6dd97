//! Chat transcript and conversational prompt construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many previous messages are quoted back to the model
const CONTEXT_MESSAGES: usize = 2;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Speaker label used inside prompt context
    fn transcript_label(&self) -> &'static str {
        match self {
            ChatRole::User => "User",
            ChatRole::Assistant => "AI",
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, text)
    }

    fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Append-only chat history, cleared in bulk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
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

    /// Build the prompt for a new question.
    ///
    /// Call this before appending the question itself: the quoted context is
    /// the last exchange that preceded it.
    pub fn build_prompt(&self, question: &str) -> String {
        let mut prompt = String::from(
            "Context: You are VisionAI, helping a visually impaired user. Analyze the image to answer.",
        );

        if !self.messages.is_empty() {
            prompt.push_str(" Previous context: ");
            let start = self.messages.len().saturating_sub(CONTEXT_MESSAGES);
            for message in &self.messages[start..] {
                prompt.push_str(&format!(
                    "{}: \"{}\". ",
                    message.role.transcript_label(),
                    message.text
                ));
            }
        }

        prompt.push_str(&format!(
            " Current Question: \"{}\". Answer directly, concisely, and naturally.",
            question
        ));
        prompt
    }
}
