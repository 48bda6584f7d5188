//! Mock gateway for development and tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::Result;

use super::{BackendGateway, NewChatResponse, SendMessageResponse, UploadResponse};

/// Canned bot replies, rotated per message so a demo conversation does not
/// repeat itself immediately
const RESPONSES: &[&str] = &[
    "Based on the document you've uploaded, I can see this relates to your question about \"{q}\". Let me walk you through what I found...",
    "Great question! Looking at the document, several sections address your inquiry. Here's what I discovered...",
    "From my analysis of the document, I can provide the following insights...",
    "I've searched through the uploaded document and found information that directly relates to \"{q}\". Here's a summary...",
    "The document mentions several key points about \"{q}\". Let me clarify them for you...",
];

/// In-process stand-in for the backend, implementing the same contract as
/// [`super::HttpGateway`].
///
/// Latency is simulated with tokio sleeps and defaults to zero so tests run
/// instantly; upload failure can be toggled to exercise the error path.
pub struct MockGateway {
    delay: Duration,
    fail_uploads: AtomicBool,
    next_response: AtomicUsize,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    /// Create a mock gateway with no simulated latency
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
            fail_uploads: AtomicBool::new(false),
            next_response: AtomicUsize::new(0),
        }
    }

    /// Create a mock gateway that sleeps before every reply, approximating
    /// real network latency for interactive use
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    /// Make subsequent uploads report `success = false`
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait::async_trait]
impl BackendGateway for MockGateway {
    async fn create_chat(&self) -> Result<NewChatResponse> {
        self.simulate_latency().await;
        let chat_id = format!("chat_{}", uuid::Uuid::new_v4().simple());
        debug!("Mock created chat {}", chat_id);
        Ok(NewChatResponse {
            chat_id,
            success: true,
        })
    }

    async fn upload_document(
        &self,
        chat_id: &str,
        _bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<UploadResponse> {
        self.simulate_latency().await;

        if self.fail_uploads.load(Ordering::SeqCst) {
            debug!("Mock rejecting upload of {} for {}", file_name, chat_id);
            return Ok(UploadResponse {
                success: false,
                message: "Upload failed. Please try again.".to_string(),
                file_name: None,
            });
        }

        Ok(UploadResponse {
            success: true,
            message: "PDF uploaded successfully".to_string(),
            file_name: Some(file_name.to_string()),
        })
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<SendMessageResponse> {
        self.simulate_latency().await;

        let index = self.next_response.fetch_add(1, Ordering::SeqCst) % RESPONSES.len();
        let response = RESPONSES[index].replace("{q}", &text.to_lowercase());

        Ok(SendMessageResponse {
            response,
            success: true,
        })
    }
}
