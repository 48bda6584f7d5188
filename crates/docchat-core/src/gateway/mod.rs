//! Backend gateway
//!
//! The three-operation remote contract the controller talks to: create a
//! chat, upload a document, send a message. [`HttpGateway`] speaks the real
//! wire protocol; [`MockGateway`] simulates it for development and tests.

mod http;
mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

pub use http::HttpGateway;
pub use mock::MockGateway;

/// Response to a create-chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatResponse {
    pub chat_id: String,
    pub success: bool,
}

/// Response to a document upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Response to a sent message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub response: String,
    pub success: bool,
}

/// Request body for sending a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub message: String,
}

/// Remote operations consumed by the session controller.
///
/// Every call is asynchronous and fallible. A transport or decode fault
/// surfaces as `Err`; a backend rejection arrives as a decoded response
/// with `success = false`, which the controller maps to a gateway error.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Create a new chat on the backend, returning its id
    async fn create_chat(&self) -> Result<NewChatResponse>;

    /// Upload a document into the given chat
    async fn upload_document(
        &self,
        chat_id: &str,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<UploadResponse>;

    /// Send a message to the given chat and get the bot's reply
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<SendMessageResponse>;
}
