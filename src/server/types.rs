//! src/server/types.rs
//!
//! JSON bodies accepted and returned by the HTTP handlers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AskRequest {
    /// A missing question is treated as an empty one.
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AskResponse {
    pub answer: String,
    /// Only present when the no-match fallback offers suggestions.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub suggested_questions: Option<Vec<String>>,
}

impl AskResponse {
    pub fn answer(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            suggested_questions: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub qa_count: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub qa_count: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
