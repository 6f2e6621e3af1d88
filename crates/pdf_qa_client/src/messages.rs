//! HTTP message types for the upload, chat and document-listing endpoints.

use serde::{Deserialize, Serialize};

/// Client → server: chat question body for `POST /chat/`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub question: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub fn new(question: &'a str) -> Self {
        Self { question }
    }
}

/// Server → client: successful `POST /upload/`. The document id is opaque and
/// only displayed, so any JSON value is accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub document_id: serde_json::Value,
}

impl UploadResponse {
    pub fn document_id_text(&self) -> String {
        value_text(&self.document_id)
    }
}

/// Server → client: successful `POST /chat/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub matches: u64,
    #[serde(default)]
    pub top_similarity: Option<f64>,
}

/// One entry of the document listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentEntry {
    pub filename: String,
    pub uploaded_at: String,
    #[serde(default)]
    pub chunk_count: Option<u64>,
}

/// Server → client: `GET /chat/documents`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentListing {
    pub count: u64,
    /// Absent only in malformed replies; a non-zero count without it is an error.
    #[serde(default)]
    pub documents: Option<Vec<DocumentEntry>>,
}

/// Server → client: failure body. FastAPI sends a string for raised errors and
/// an array of objects for request validation errors.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub detail: serde_json::Value,
}

impl ErrorDetail {
    /// Detail text for display.
    pub fn into_text(self) -> String {
        value_text(&self.detail)
    }
}

/// Strings as-is, anything else as compact JSON.
fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
