//! In-memory session collection

use tracing::debug;

use crate::session::{ChatSession, Message, UploadStatus};

/// In-memory store holding every chat session plus the pointer to the
/// active one.
///
/// All operations are synchronous, pure state transitions and total: a
/// mutation that targets a missing session degrades to a silent no-op
/// instead of failing. That keeps the store robust against orderings where
/// an asynchronous gateway completion lands after the session it targeted
/// was switched away from or deleted.
#[derive(Debug, Default)]
pub struct SessionStore {
    /// Sessions ordered by recency of creation, most recent first
    sessions: Vec<ChatSession>,
    /// Id of the active session; always references an entry in `sessions`
    current_id: Option<String>,
    /// Upload state scoped to the current session
    upload_status: UploadStatus,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session with the given id and make it current.
    ///
    /// The session is inserted at the front only if no session with that id
    /// exists yet, so ids stay unique.
    pub fn create_session(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.sessions.iter().any(|s| s.id == id) {
            debug!("Creating session {}", id);
            self.sessions.insert(0, ChatSession::new(id.clone()));
        }
        self.current_id = Some(id);
    }

    /// Make the session with the given id current. No-op if absent.
    pub fn set_current(&mut self, id: &str) {
        if self.sessions.iter().any(|s| s.id == id) {
            self.current_id = Some(id.to_string());
        }
    }

    /// Append a message to the current session. No-op without one.
    pub fn append_message(&mut self, message: Message) {
        if let Some(session) = self.current_mut() {
            session.add_message(message);
        }
    }

    /// Append a message to a specific session, regardless of which one is
    /// current. No-op if that session no longer exists, which is how a
    /// completion for a since-deleted session is absorbed.
    pub fn append_message_to(&mut self, id: &str, message: Message) {
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => session.add_message(message),
            None => debug!("Dropping message for unknown session {}", id),
        }
    }

    /// Mark a document as attached on the current session. No-op without one.
    pub fn mark_document_attached(&mut self, name: impl Into<String>) {
        if let Some(session) = self.current_mut() {
            session.attach_document(name);
        }
    }

    /// Detach the current session's document. No-op without one.
    pub fn detach_document(&mut self) {
        if let Some(session) = self.current_mut() {
            session.detach_document();
        }
    }

    /// Empty the current session's messages, keeping the session itself.
    pub fn clear_messages(&mut self) {
        if let Some(session) = self.current_mut() {
            session.clear_messages();
        }
    }

    /// Remove the session with the given id.
    ///
    /// If it was current, the most recently created remaining session
    /// becomes current, or none when the store is empty.
    pub fn delete_session(&mut self, id: &str) {
        self.sessions.retain(|s| s.id != id);
        if self.current_id.as_deref() == Some(id) {
            self.current_id = self.sessions.first().map(|s| s.id.clone());
            debug!("Current session deleted, now {:?}", self.current_id);
        }
    }

    /// Set the upload status for the current session
    pub fn set_upload_status(&mut self, status: UploadStatus) {
        self.upload_status = status;
    }

    /// Upload status of the current session
    pub fn upload_status(&self) -> UploadStatus {
        self.upload_status
    }

    /// The current session, if any
    pub fn current(&self) -> Option<&ChatSession> {
        let id = self.current_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Id of the current session, if any
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// All sessions, most recently created first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Number of sessions in the store
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn current_mut(&mut self) -> Option<&mut ChatSession> {
        let id = self.current_id.clone()?;
        self.sessions.iter_mut().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sets_current_and_orders_by_recency() {
        let mut store = SessionStore::new();
        store.create_session("a");
        store.create_session("b");
        store.create_session("c");

        assert_eq!(store.current_id(), Some("c"));
        let ids: Vec<_> = store.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }

    #[test]
    fn test_create_is_duplicate_safe() {
        let mut store = SessionStore::new();
        store.create_session("a");
        store.create_session("b");
        store.create_session("a");

        assert_eq!(store.len(), 2);
        // Re-creating an existing id only reselects it
        assert_eq!(store.current_id(), Some("a"));
        assert_eq!(store.sessions()[0].id, "b");
    }

    #[test]
    fn test_append_without_current_is_noop() {
        let mut store = SessionStore::new();
        store.append_message(Message::user("lost"));
        assert!(store.is_empty());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_append_targets_current() {
        let mut store = SessionStore::new();
        store.create_session("a");
        store.create_session("b");
        store.set_current("a");
        store.append_message(Message::user("hi"));

        let a = store.sessions().iter().find(|s| s.id == "a").unwrap();
        let b = store.sessions().iter().find(|s| s.id == "b").unwrap();
        assert_eq!(a.message_count(), 1);
        assert_eq!(b.message_count(), 0);
    }

    #[test]
    fn test_targeted_append_survives_session_switch() {
        let mut store = SessionStore::new();
        store.create_session("a");
        store.create_session("b");
        store.append_message_to("a", Message::bot("late reply"));

        let a = store.sessions().iter().find(|s| s.id == "a").unwrap();
        assert_eq!(a.message_count(), 1);
        assert_eq!(store.current_id(), Some("b"));
    }

    #[test]
    fn test_targeted_append_to_deleted_session_is_noop() {
        let mut store = SessionStore::new();
        store.create_session("a");
        store.delete_session("a");
        store.append_message_to("a", Message::bot("stale"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_current_reassigns_to_front() {
        let mut store = SessionStore::new();
        store.create_session("a");
        store.create_session("b");
        store.create_session("c");
        assert_eq!(store.current_id(), Some("c"));

        store.delete_session("c");
        assert_eq!(store.current_id(), Some("b"));

        store.delete_session("b");
        store.delete_session("a");
        assert_eq!(store.current_id(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_other_keeps_current() {
        let mut store = SessionStore::new();
        store.create_session("b");
        store.create_session("a");
        assert_eq!(store.current_id(), Some("a"));

        store.delete_session("b");
        assert_eq!(store.current_id(), Some("a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_current_unknown_id_is_noop() {
        let mut store = SessionStore::new();
        store.create_session("a");
        store.set_current("missing");
        assert_eq!(store.current_id(), Some("a"));
    }

    #[test]
    fn test_attach_detach_round_trip() {
        let mut store = SessionStore::new();
        store.create_session("a");
        store.mark_document_attached("spec.pdf");

        let current = store.current().unwrap();
        assert!(current.document_attached);
        assert_eq!(current.document_name.as_deref(), Some("spec.pdf"));

        store.detach_document();
        let current = store.current().unwrap();
        assert!(!current.document_attached);
        assert!(current.document_name.is_none());
    }

    #[test]
    fn test_clear_messages_keeps_session() {
        let mut store = SessionStore::new();
        store.create_session("a");
        store.append_message(Message::user("one"));
        store.append_message(Message::bot("two"));
        store.clear_messages();

        assert_eq!(store.len(), 1);
        assert!(store.current().unwrap().is_empty());
    }
}
