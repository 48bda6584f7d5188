//! Session controller
//!
//! Orchestrates user actions against the backend gateway and applies the
//! resulting transitions to the session store. This is the only place where
//! asynchronous I/O and state mutation meet; the store itself never does I/O.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::gateway::BackendGateway;
use crate::session::{Message, SessionStore, UploadStatus};

/// Magic bytes every PDF starts with
const PDF_MAGIC: &[u8] = b"%PDF";

/// Drives the chat flows: new chat, send message, attach document, delete.
///
/// Owns the [`SessionStore`] outright, so every mutation funnels through one
/// writer. Gateway failures never leave the store partially mutated: create
/// and upload mutate only after the gateway confirms, and a failed send
/// keeps the optimistically appended user message by design (at-least-once,
/// no rollback).
pub struct SessionController {
    store: SessionStore,
    gateway: Arc<dyn BackendGateway>,
}

impl SessionController {
    /// Create a controller with an empty store
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            store: SessionStore::new(),
            gateway,
        }
    }

    /// Read access to the session state
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Create a new chat on the backend and make it the current session.
    ///
    /// The store is untouched unless the gateway confirms.
    pub async fn new_chat(&mut self) -> Result<String> {
        let response = self.gateway.create_chat().await?;
        if !response.success {
            warn!("Backend refused to create a chat");
            return Err(Error::Gateway("Backend refused to create a chat".into()));
        }

        info!("Created chat {}", response.chat_id);
        self.store.create_session(&response.chat_id);
        self.store.set_upload_status(UploadStatus::Idle);
        Ok(response.chat_id)
    }

    /// Send a message in the current chat and append the bot's reply.
    ///
    /// Validation happens locally before any gateway round trip: the text
    /// must be non-empty after trimming, a current session must exist, and
    /// it must have a document attached. The user's message is appended
    /// optimistically; a gateway failure leaves it in place.
    pub async fn send_message(&mut self, text: &str) -> Result<Message> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation("Message text is empty".into()));
        }
        let session = self
            .store
            .current()
            .ok_or_else(|| Error::Validation("No active chat".into()))?;
        if !session.document_attached {
            return Err(Error::Validation(
                "Upload a PDF before starting the conversation".into(),
            ));
        }
        let chat_id = session.id.clone();

        self.store.append_message(Message::user(text));

        let response = match self.gateway.send_message(&chat_id, text).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Send failed for chat {}: {}", chat_id, e);
                return Err(e);
            }
        };
        if !response.success {
            warn!("Backend refused message for chat {}", chat_id);
            return Err(Error::Gateway("Backend refused the message".into()));
        }

        let bot_message = Message::bot(response.response);
        // Targeted append: lands in the originating session even if the
        // user switched or deleted it while the call was in flight
        self.store
            .append_message_to(&chat_id, bot_message.clone());
        Ok(bot_message)
    }

    /// Upload a document into the current chat and record the attachment.
    ///
    /// The file type is checked locally (extension and magic bytes) before
    /// any gateway call. On failure the upload status becomes `Error` and
    /// the attachment state is untouched, so the user can retry.
    pub async fn attach_document(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        let session = self
            .store
            .current()
            .ok_or_else(|| Error::Validation("No active chat".into()))?;
        let chat_id = session.id.clone();

        if !file_name.to_lowercase().ends_with(".pdf") || !bytes.starts_with(PDF_MAGIC) {
            return Err(Error::Validation("Only PDF files are accepted".into()));
        }

        self.store.set_upload_status(UploadStatus::Uploading);

        let response = match self.gateway.upload_document(&chat_id, bytes, file_name).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Upload failed for chat {}: {}", chat_id, e);
                self.store.set_upload_status(UploadStatus::Error);
                return Err(e);
            }
        };
        if !response.success {
            warn!("Backend rejected upload for chat {}: {}", chat_id, response.message);
            self.store.set_upload_status(UploadStatus::Error);
            return Err(Error::Gateway(response.message));
        }

        let name = response.file_name.unwrap_or_else(|| file_name.to_string());
        info!("Attached {} to chat {}", name, chat_id);
        self.store.mark_document_attached(name);
        self.store.set_upload_status(UploadStatus::Success);
        Ok(())
    }

    /// Detach the current chat's document. Local only.
    pub fn detach_document(&mut self) {
        self.store.detach_document();
        self.store.set_upload_status(UploadStatus::Idle);
    }

    /// Switch to another existing chat.
    ///
    /// The upload status is re-derived from that session's own attachment
    /// flag; a chat with an attached document is never shown as uploading.
    pub fn select_chat(&mut self, id: &str) {
        self.store.set_current(id);
        let status = match self.store.current() {
            Some(session) if session.document_attached => UploadStatus::Success,
            _ => UploadStatus::Idle,
        };
        self.store.set_upload_status(status);
    }

    /// Delete a chat. Local only, no gateway call.
    pub fn delete_chat(&mut self, id: &str) {
        self.store.delete_session(id);
    }

    /// Clear the current chat's messages, keeping the chat itself.
    pub fn clear_messages(&mut self) {
        self.store.clear_messages();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::gateway::{
        MockGateway, NewChatResponse, SendMessageResponse, UploadResponse,
    };
    use crate::session::Sender;

    /// Gateway double that counts calls and can be told to fail outright
    #[derive(Default)]
    struct RecordingGateway {
        calls: AtomicUsize,
        fail: bool,
    }

    impl RecordingGateway {
        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn check(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(Error::Gateway("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl crate::gateway::BackendGateway for RecordingGateway {
        async fn create_chat(&self) -> Result<NewChatResponse> {
            self.check()?;
            Ok(NewChatResponse {
                chat_id: "chat_test".into(),
                success: true,
            })
        }

        async fn upload_document(
            &self,
            _chat_id: &str,
            _bytes: Vec<u8>,
            file_name: &str,
        ) -> Result<UploadResponse> {
            self.check()?;
            Ok(UploadResponse {
                success: true,
                message: "ok".into(),
                file_name: Some(file_name.into()),
            })
        }

        async fn send_message(&self, _chat_id: &str, _text: &str) -> Result<SendMessageResponse> {
            self.check()?;
            Ok(SendMessageResponse {
                response: "reply".into(),
                success: true,
            })
        }
    }

    fn mock_controller() -> SessionController {
        SessionController::new(Arc::new(MockGateway::new()))
    }

    #[tokio::test]
    async fn test_full_round_trip() {
        let mut controller = mock_controller();

        let chat_id = controller.new_chat().await.unwrap();
        controller
            .attach_document("spec.pdf", b"%PDF-1.4 test".to_vec())
            .await
            .unwrap();
        controller.send_message("hello").await.unwrap();

        let session = controller.store().current().unwrap();
        assert_eq!(session.id, chat_id);
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.messages[0].sender, Sender::User);
        assert_eq!(session.messages[0].content, "hello");
        assert_eq!(session.messages[1].sender, Sender::Bot);
        assert_eq!(controller.store().upload_status(), UploadStatus::Success);
    }

    #[tokio::test]
    async fn test_send_without_document_skips_gateway() {
        let gateway = Arc::new(RecordingGateway::default());
        let mut controller = SessionController::new(gateway.clone());
        controller.new_chat().await.unwrap();
        let calls_after_create = gateway.call_count();

        let err = controller.send_message("hello").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(gateway.call_count(), calls_after_create);
        assert!(controller.store().current().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_empty_text_is_validation_error() {
        let mut controller = mock_controller();
        controller.new_chat().await.unwrap();

        let err = controller.send_message("   ").await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_send_without_chat_is_validation_error() {
        let mut controller = mock_controller();
        let err = controller.send_message("hello").await.unwrap_err();
        assert!(err.is_validation());
        assert!(controller.store().is_empty());
    }

    #[tokio::test]
    async fn test_failed_send_keeps_user_message() {
        let mock = Arc::new(MockGateway::new());
        let mut controller = SessionController::new(mock);
        controller.new_chat().await.unwrap();
        controller
            .attach_document("a.pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap();

        // Swap in a gateway that fails every call, simulating a transport
        // fault after the optimistic append
        controller.gateway = Arc::new(RecordingGateway::failing());
        let err = controller.send_message("hello").await.unwrap_err();
        assert!(!err.is_validation());

        let session = controller.store().current().unwrap();
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.messages[0].sender, Sender::User);
    }

    #[tokio::test]
    async fn test_wrong_file_type_rejected_locally() {
        let gateway = Arc::new(RecordingGateway::default());
        let mut controller = SessionController::new(gateway.clone());
        controller.new_chat().await.unwrap();
        let calls_after_create = gateway.call_count();

        let err = controller
            .attach_document("notes.txt", b"plain text".to_vec())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(gateway.call_count(), calls_after_create);
        assert_eq!(controller.store().upload_status(), UploadStatus::Idle);
    }

    #[tokio::test]
    async fn test_upload_rejection_sets_error_status() {
        let mock = Arc::new(MockGateway::new());
        mock.set_fail_uploads(true);
        let mut controller = SessionController::new(mock.clone());
        controller.new_chat().await.unwrap();

        let err = controller
            .attach_document("spec.pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap_err();
        assert!(!err.is_validation());
        assert_eq!(controller.store().upload_status(), UploadStatus::Error);
        assert!(!controller.store().current().unwrap().document_attached);

        // Retry succeeds once the backend recovers
        mock.set_fail_uploads(false);
        controller
            .attach_document("spec.pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap();
        assert_eq!(controller.store().upload_status(), UploadStatus::Success);
        assert!(controller.store().current().unwrap().document_attached);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_store_untouched() {
        let mut controller = SessionController::new(Arc::new(RecordingGateway::failing()));
        let err = controller.new_chat().await.unwrap_err();
        assert!(!err.is_validation());
        assert!(controller.store().is_empty());
        assert!(controller.store().current().is_none());
    }

    #[tokio::test]
    async fn test_detach_resets_status() {
        let mut controller = mock_controller();
        controller.new_chat().await.unwrap();
        controller
            .attach_document("spec.pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap();

        controller.detach_document();
        let session = controller.store().current().unwrap();
        assert!(!session.document_attached);
        assert!(session.document_name.is_none());
        assert_eq!(controller.store().upload_status(), UploadStatus::Idle);
    }

    #[tokio::test]
    async fn test_select_chat_rederives_status() {
        let mut controller = mock_controller();
        let first = controller.new_chat().await.unwrap();
        controller
            .attach_document("spec.pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap();
        let second = controller.new_chat().await.unwrap();
        assert_eq!(controller.store().upload_status(), UploadStatus::Idle);

        controller.select_chat(&first);
        assert_eq!(controller.store().upload_status(), UploadStatus::Success);
        controller.select_chat(&second);
        assert_eq!(controller.store().upload_status(), UploadStatus::Idle);
    }

    #[tokio::test]
    async fn test_delete_non_current_keeps_current() {
        let mut controller = mock_controller();
        let first = controller.new_chat().await.unwrap();
        let second = controller.new_chat().await.unwrap();

        controller.delete_chat(&first);
        assert_eq!(controller.store().current_id(), Some(second.as_str()));
        assert_eq!(controller.store().len(), 1);
    }
}
