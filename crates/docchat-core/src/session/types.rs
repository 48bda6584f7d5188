//! Session types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier
    pub id: String,
    /// Message text (non-empty)
    pub content: String,
    /// Message author
    pub sender: Sender,
    /// Creation timestamp. Ordering within a session follows insertion,
    /// not this field, so equal timestamps are harmless.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user message with a fresh id and timestamp
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Sender::User)
    }

    /// Create a bot message with a fresh id and timestamp
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Bot)
    }

    fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

/// One chat conversation: its messages and attached-document state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (assigned by the backend on create)
    pub id: String,
    /// Conversation messages, insertion-ordered
    pub messages: Vec<Message>,
    /// Whether a document has been attached to this session
    pub document_attached: bool,
    /// Name of the attached document; `Some` exactly when
    /// `document_attached` is true
    pub document_name: Option<String>,
    /// Session creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a new empty session with the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: Vec::new(),
            document_attached: false,
            document_name: None,
            created_at: Utc::now(),
        }
    }

    /// Add a message to the session
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Clear all messages in the session
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// Record an attached document
    pub fn attach_document(&mut self, name: impl Into<String>) {
        self.document_attached = true;
        self.document_name = Some(name.into());
    }

    /// Remove the attached document, restoring the initial state
    pub fn detach_document(&mut self) {
        self.document_attached = false;
        self.document_name = None;
    }

    /// Get message count
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Check if session has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = ChatSession::new("chat-123");
        assert_eq!(session.id, "chat-123");
        assert!(session.messages.is_empty());
        assert!(!session.document_attached);
        assert!(session.document_name.is_none());
    }

    #[test]
    fn test_add_message() {
        let mut session = ChatSession::new("chat-123");
        session.add_message(Message::user("Hello"));
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.messages[0].sender, Sender::User);
    }

    #[test]
    fn test_attach_detach_document() {
        let mut session = ChatSession::new("chat-123");
        session.attach_document("report.pdf");
        assert!(session.document_attached);
        assert_eq!(session.document_name.as_deref(), Some("report.pdf"));

        session.detach_document();
        assert!(!session.document_attached);
        assert!(session.document_name.is_none());
    }

    #[test]
    fn test_message_ids_unique() {
        let a = Message::user("one");
        let b = Message::user("one");
        assert_ne!(a.id, b.id);
    }
}
