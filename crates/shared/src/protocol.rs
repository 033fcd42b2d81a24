use serde::{Deserialize, Serialize};

pub const CHAT_PATH: &str = "api/chat";
pub const UPLOAD_PATH: &str = "api/upload";
/// Multipart field name repeated once per uploaded file.
pub const UPLOAD_FIELD: &str = "files";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(
        rename = "userLang",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_lang: Option<String>,
}

impl ChatRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_lang: None,
        }
    }

    pub fn with_user_lang(mut self, user_lang: Option<String>) -> Self {
        self.user_lang = user_lang;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBlock {
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
    #[serde(default)]
    pub tables: Vec<TableBlock>,
    #[serde(default)]
    pub images: Vec<ImageBlock>,
}

impl ChatResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tables: Vec::new(),
            images: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub indexed: u64,
}
