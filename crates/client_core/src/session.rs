use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{
    chat::ChatCoordinator,
    error::BackendError,
    notification::Notification,
    transcript::TranscriptState,
    transport::{HttpBackend, HttpBackendConfig, MissingBackend, RagBackend},
    upload::{UploadCoordinator, UploadedFiles},
};

const NOTIFICATION_CAPACITY: usize = 64;

/// Owns the per-session state and the coordinators that mutate it.
///
/// The transcript is written only by the chat coordinator and the uploaded
/// file list only by the upload coordinator.
pub struct ChatSession {
    transcript: Arc<TranscriptState>,
    uploaded_files: Arc<UploadedFiles>,
    notifications: broadcast::Sender<Notification>,
    chat: ChatCoordinator,
    uploads: UploadCoordinator,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn RagBackend>) -> Self {
        Self::new_with_user_lang(backend, None)
    }

    pub fn new_with_user_lang(backend: Arc<dyn RagBackend>, user_lang: Option<String>) -> Self {
        let transcript = Arc::new(TranscriptState::new());
        let uploaded_files = Arc::new(UploadedFiles::new());
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            chat: ChatCoordinator::new(backend.clone(), transcript.clone(), user_lang),
            uploads: UploadCoordinator::new(
                backend,
                uploaded_files.clone(),
                notifications.clone(),
            ),
            transcript,
            uploaded_files,
            notifications,
        }
    }

    pub fn connect(
        config: HttpBackendConfig,
        user_lang: Option<String>,
    ) -> Result<Self, BackendError> {
        let backend = HttpBackend::new(config)?;
        Ok(Self::new_with_user_lang(Arc::new(backend), user_lang))
    }

    pub fn disconnected() -> Self {
        Self::new(Arc::new(MissingBackend))
    }

    pub fn chat(&self) -> &ChatCoordinator {
        &self.chat
    }

    pub fn uploads(&self) -> &UploadCoordinator {
        &self.uploads
    }

    pub fn transcript(&self) -> &TranscriptState {
        &self.transcript
    }

    pub fn uploaded_files(&self) -> &UploadedFiles {
        &self.uploaded_files
    }

    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
