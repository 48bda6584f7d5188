//! HTTP gateway client

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};

use super::{BackendGateway, NewChatResponse, SendMessageRequest, SendMessageResponse, UploadResponse};

/// Production gateway speaking HTTP with JSON and multipart bodies.
///
/// Endpoints, relative to the configured base URL:
/// `POST new-chat`, `POST pdf-upload` (multipart), `POST send-message` (JSON).
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a new gateway client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.gateway.timeout_secs))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: config.gateway.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create with a custom base URL (for testing or custom endpoints)
    pub fn with_base_url(config: &Config, base_url: impl Into<String>) -> Result<Self> {
        let mut gateway = Self::new(config)?;
        gateway.base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(gateway)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("Gateway error: {} - {}", status, body);
            return Err(Error::Gateway(format!("{}: {}", status, body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Gateway(format!("Failed to parse response: {} - {}", e, body)))
    }
}

#[async_trait::async_trait]
impl BackendGateway for HttpGateway {
    async fn create_chat(&self) -> Result<NewChatResponse> {
        let url = self.endpoint("new-chat");
        debug!("Creating chat: {}", url);

        let response = self.client.post(&url).send().await.map_err(Error::Http)?;
        self.decode(response).await
    }

    async fn upload_document(
        &self,
        chat_id: &str,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<UploadResponse> {
        let url = self.endpoint("pdf-upload");
        debug!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), url);

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(Error::Http)?;
        let form = Form::new()
            .part("pdf", part)
            .text("chatId", chat_id.to_string());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(Error::Http)?;
        self.decode(response).await
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<SendMessageResponse> {
        let url = self.endpoint("send-message");
        debug!("Sending message to {}", url);

        let request = SendMessageRequest {
            chat_id: chat_id.to_string(),
            message: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(Error::Http)?;
        self.decode(response).await
    }
}
