use thiserror::Error;

/// Failure of a single request to the retrieval backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed with status code {status}")]
    Status { status: u16, detail: Option<String> },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response from backend: {0}")]
    MalformedResponse(String),
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Structured detail reported by the backend, when it sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Text shown to the user: the backend's detail, else the failure itself.
    pub fn user_message(&self) -> String {
        match (self.detail(), self) {
            (Some(detail), _) => detail.to_string(),
            (None, BackendError::Transport(err)) if err.is_timeout() => {
                format!("request timed out: {err}")
            }
            (None, _) => self.to_string(),
        }
    }
}
