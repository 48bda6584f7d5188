//! docchat-core: DocChat Client Core Library
//!
//! Client-side core for chatting with an uploaded PDF: the in-memory
//! session store, the upload status tracker, the backend gateway contract
//! (with HTTP and mock implementations) and the controller that ties
//! gateway outcomes to state transitions.

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod session;

pub use config::{Config, GatewayConfig};
pub use controller::SessionController;
pub use error::{Error, Result};
pub use gateway::{BackendGateway, HttpGateway, MockGateway};
pub use session::{ChatSession, Message, Sender, SessionStore, UploadStatus};
