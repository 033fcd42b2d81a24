//! Client-side state and backend protocol for a document-grounded chat
//! service: uploads, the chat transcript, and the session that owns them.

pub mod chat;
pub mod error;
pub mod notification;
mod pending;
pub mod session;
pub mod transcript;
pub mod transport;
pub mod upload;

pub use chat::{ChatCoordinator, SubmitOutcome};
pub use error::BackendError;
pub use notification::{Notification, NotificationLevel};
pub use session::ChatSession;
pub use transcript::{TranscriptSnapshot, TranscriptState};
pub use transport::{HttpBackend, HttpBackendConfig, MissingBackend, RagBackend, UploadFile};
pub use upload::{UploadCoordinator, UploadOutcome, UploadedFiles, UploadedFilesSnapshot};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
