use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    error::ErrorBody,
    protocol::{ChatRequest, ChatResponse, UploadResponse, CHAT_PATH, UPLOAD_FIELD, UPLOAD_PATH},
};
use tracing::debug;
use url::Url;

use crate::error::BackendError;

/// One user-selected file, read into memory and ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

#[async_trait]
pub trait RagBackend: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, BackendError>;
    /// Sends the whole batch as one request.
    async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadResponse, BackendError>;
}

pub struct MissingBackend;

#[async_trait]
impl RagBackend for MissingBackend {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, BackendError> {
        Err(BackendError::Unavailable(
            "no chat backend configured".to_string(),
        ))
    }

    async fn upload(&self, _files: Vec<UploadFile>) -> Result<UploadResponse, BackendError> {
        Err(BackendError::Unavailable(
            "no upload backend configured".to_string(),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    pub server_url: String,
    pub request_timeout: Option<Duration>,
}

impl HttpBackendConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            request_timeout: None,
        }
    }
}

pub struct HttpBackend {
    http: Client,
    chat_url: Url,
    upload_url: Url,
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> Result<Self, BackendError> {
        let base = base_url(&config.server_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            chat_url: base.join(CHAT_PATH)?,
            upload_url: base.join(UPLOAD_PATH)?,
        })
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }
}

#[async_trait]
impl RagBackend for HttpBackend {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, BackendError> {
        let response = self
            .http
            .post(self.chat_url.clone())
            .json(&request)
            .send()
            .await?;
        decode_json(ensure_success(response).await?).await
    }

    async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadResponse, BackendError> {
        let mut form = Form::new();
        for file in files {
            let mut part = Part::bytes(file.bytes).file_name(file.name);
            if let Some(mime_type) = file.mime_type.as_deref() {
                part = part.mime_str(mime_type)?;
            }
            form = form.part(UPLOAD_FIELD, part);
        }
        let response = self
            .http
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;
        decode_json(ensure_success(response).await?).await
    }
}

/// Parses the configured server url so that endpoint paths join beneath it
/// instead of replacing its last segment.
fn base_url(server_url: &str) -> Result<Url, BackendError> {
    let mut raw = server_url.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Ok(Url::parse(&raw)?)
}

async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let detail = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.detail_text());
    debug!(status = status.as_u16(), ?detail, "backend returned error status");
    Err(BackendError::Status {
        status: status.as_u16(),
        detail,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| BackendError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
