//! The prompt payload shared by both hops of the relay.

use crate::error::AppError;
use axum::{
    Json,
    async_trait,
    extract::{FromRequest, Request},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const INVALID_PROMPT_MESSAGE: &str = r#"Body must include: { "prompt": "..." }"#;

/// A caller-supplied prompt that is a string with at least one
/// non-whitespace character. The original text is kept untrimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn parse(raw: impl Into<String>) -> Result<Self, AppError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AppError::BadRequest(INVALID_PROMPT_MESSAGE.to_string()));
        }
        Ok(Self(raw))
    }

    /// Validate the `prompt` field of an already-decoded JSON body.
    pub fn from_body(body: &Value) -> Result<Self, AppError> {
        match body.get("prompt") {
            Some(Value::String(s)) => Self::parse(s.as_str()),
            _ => Err(AppError::BadRequest(INVALID_PROMPT_MESSAGE.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Any JSON rejection (wrong content type, malformed body) is a 400, like a
/// missing field.
#[async_trait]
impl<S> FromRequest<S> for Prompt
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Rejected prompt body");
            AppError::BadRequest(INVALID_PROMPT_MESSAGE.to_string())
        })?;

        Prompt::from_body(&body)
    }
}

/// Wire body for `POST /api/ask` and `POST /api/claude`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

impl From<&Prompt> for PromptRequest {
    fn from(prompt: &Prompt) -> Self {
        Self {
            prompt: prompt.as_str().to_string(),
        }
    }
}

/// Successful completion body returned by both services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextReply {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_missing_empty_and_non_string_prompts() {
        for body in [
            json!({}),
            json!({ "prompt": "" }),
            json!({ "prompt": "   \n\t" }),
            json!({ "prompt": 42 }),
            json!({ "prompt": null }),
            json!({ "prompt": ["hi"] }),
            json!("hi"),
        ] {
            let err = Prompt::from_body(&body).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "accepted {body}");
        }
    }

    #[test]
    fn keeps_surrounding_whitespace() {
        let prompt = Prompt::from_body(&json!({ "prompt": "  Say hi " })).unwrap();
        assert_eq!(prompt.as_str(), "  Say hi ");
    }
}
