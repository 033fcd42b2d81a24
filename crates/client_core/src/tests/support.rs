use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use shared::protocol::{ChatRequest, ChatResponse, UploadResponse};
use tokio::sync::{Mutex, Notify};

use crate::{
    error::BackendError,
    transport::{RagBackend, UploadFile},
};

/// Holds a request open until the test releases it.
#[derive(Clone, Default)]
pub(crate) struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// In-memory backend answering from queued replies and recording every call.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    chat_replies: Mutex<VecDeque<Result<ChatResponse, BackendError>>>,
    upload_replies: Mutex<VecDeque<Result<UploadResponse, BackendError>>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    pub upload_batches: Mutex<Vec<Vec<String>>>,
    gate: Option<Gate>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Gate) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub async fn answer(self, text: &str) -> Self {
        self.chat_replies
            .lock()
            .await
            .push_back(Ok(ChatResponse::text(text)));
        self
    }

    pub async fn fail_chat(self, err: BackendError) -> Self {
        self.chat_replies.lock().await.push_back(Err(err));
        self
    }

    pub async fn indexed(self, indexed: u64) -> Self {
        self.upload_replies
            .lock()
            .await
            .push_back(Ok(UploadResponse { indexed }));
        self
    }

    pub async fn fail_upload(self, err: BackendError) -> Self {
        self.upload_replies.lock().await.push_back(Err(err));
        self
    }

    pub async fn chat_calls(&self) -> usize {
        self.chat_requests.lock().await.len()
    }

    pub async fn upload_calls(&self) -> usize {
        self.upload_batches.lock().await.len()
    }

    async fn wait_at_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }
}

#[async_trait]
impl RagBackend for ScriptedBackend {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, BackendError> {
        self.chat_requests.lock().await.push(request);
        self.wait_at_gate().await;
        self.chat_replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Unavailable("no scripted reply".to_string())))
    }

    async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadResponse, BackendError> {
        self.upload_batches
            .lock()
            .await
            .push(files.into_iter().map(|file| file.name).collect());
        self.wait_at_gate().await;
        self.upload_replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Unavailable("no scripted reply".to_string())))
    }
}

pub(crate) fn status_error(status: u16, detail: Option<&str>) -> BackendError {
    BackendError::Status {
        status,
        detail: detail.map(str::to_string),
    }
}
