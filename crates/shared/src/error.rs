use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body the backend attaches to non-2xx responses.
///
/// `detail` is usually a string, but request validation failures carry a
/// structured list instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    /// Human-readable detail, if the backend supplied a usable one.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used_verbatim() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"rate limited"}"#).expect("decode");
        assert_eq!(body.detail_text().as_deref(), Some("rate limited"));
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","query"],"msg":"field required"}]}"#)
                .expect("decode");
        assert_eq!(
            body.detail_text().as_deref(),
            Some(r#"[{"loc":["body","query"],"msg":"field required"}]"#)
        );
    }

    #[test]
    fn missing_null_or_empty_detail_yields_none() {
        for raw in [r#"{}"#, r#"{"detail":null}"#, r#"{"detail":""}"#] {
            let body: ErrorBody = serde_json::from_str(raw).expect("decode");
            assert_eq!(body.detail_text(), None, "input: {raw}");
        }
    }
}
