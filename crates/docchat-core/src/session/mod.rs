//! Session state module
//!
//! Holds the chat-session data model, the in-memory session collection and
//! the upload status tracker. Nothing in this module performs I/O.

mod store;
mod types;
mod upload;

pub use store::SessionStore;
pub use types::{ChatSession, Message, Sender};
pub use upload::UploadStatus;
