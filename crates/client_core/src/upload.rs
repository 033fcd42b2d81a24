use std::sync::Arc;

use shared::domain::UploadedFileRecord;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use crate::{
    error::BackendError,
    notification::Notification,
    pending::PendingFlag,
    transport::{RagBackend, UploadFile},
};

pub type UploadedFilesSnapshot = Arc<Vec<UploadedFileRecord>>;

/// Names of every file the backend has confirmed indexing, in upload order.
#[derive(Debug)]
pub struct UploadedFiles {
    tx: watch::Sender<UploadedFilesSnapshot>,
}

impl Default for UploadedFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadedFiles {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Vec::new()));
        Self { tx }
    }

    pub fn snapshot(&self) -> UploadedFilesSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadedFilesSnapshot> {
        self.tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn append(&self, records: impl IntoIterator<Item = UploadedFileRecord>) {
        let mut next = self.snapshot().as_ref().clone();
        next.extend(records);
        self.tx.send_replace(Arc::new(next));
    }
}

#[derive(Debug)]
pub enum UploadOutcome {
    /// Empty selection; nothing was sent.
    Ignored,
    /// Another upload is still in flight.
    Busy,
    Uploaded { indexed: u64, files: usize },
    Failed(BackendError),
}

pub struct UploadCoordinator {
    backend: Arc<dyn RagBackend>,
    records: Arc<UploadedFiles>,
    notifications: broadcast::Sender<Notification>,
    uploading: PendingFlag,
}

impl UploadCoordinator {
    pub fn new(
        backend: Arc<dyn RagBackend>,
        records: Arc<UploadedFiles>,
        notifications: broadcast::Sender<Notification>,
    ) -> Self {
        Self {
            backend,
            records,
            notifications,
            uploading: PendingFlag::default(),
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.is_set()
    }

    /// Sends the selection as a single batch. Records are appended only when
    /// the backend accepts the whole batch.
    ///
    /// Like chat submissions, the request runs on its own task and resolves
    /// even if the caller stops waiting.
    pub async fn upload(&self, files: Vec<UploadFile>) -> UploadOutcome {
        if files.is_empty() {
            debug!("upload: ignoring empty selection");
            return UploadOutcome::Ignored;
        }
        let Some(uploading) = self.uploading.try_claim() else {
            debug!("upload: batch already in flight");
            return UploadOutcome::Busy;
        };

        let selected: Vec<UploadedFileRecord> = files
            .iter()
            .map(|file| UploadedFileRecord::new(file.name.clone()))
            .collect();
        let file_count = selected.len();
        let total_bytes: usize = files.iter().map(|file| file.bytes.len()).sum();
        info!(files = file_count, total_bytes, "upload: sending batch");

        let backend = self.backend.clone();
        let records = self.records.clone();
        let notifications = self.notifications.clone();
        let task = tokio::spawn(async move {
            let _uploading = uploading;
            match backend.upload(files).await {
                Ok(response) => {
                    info!(
                        files = file_count,
                        indexed = response.indexed,
                        "upload: batch indexed"
                    );
                    notify(
                        &notifications,
                        Notification::success(format!(
                            "Uploaded {} chunks from {} file(s)!",
                            response.indexed, file_count
                        )),
                    );
                    records.append(selected);
                    UploadOutcome::Uploaded {
                        indexed: response.indexed,
                        files: file_count,
                    }
                }
                Err(err) => {
                    warn!(files = file_count, error = %err, "upload: batch failed");
                    notify(
                        &notifications,
                        Notification::error(format!("Upload failed: {}", err.user_message())),
                    );
                    UploadOutcome::Failed(err)
                }
            }
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "upload: batch task aborted");
                UploadOutcome::Failed(BackendError::Unavailable(format!(
                    "upload task aborted: {err}"
                )))
            }
        }
    }
}

fn notify(notifications: &broadcast::Sender<Notification>, notification: Notification) {
    // Dropped silently when nobody subscribes.
    let _ = notifications.send(notification);
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
