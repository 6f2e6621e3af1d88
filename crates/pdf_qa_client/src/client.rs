//! HTTP client: upload a PDF, ask a question, fetch the document listing.

use serde::de::DeserializeOwned;

use crate::messages::{ChatRequest, ChatResponse, DocumentListing, ErrorDetail, UploadResponse};

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

const UPLOAD_PATH: &str = "/upload/";
const CHAT_PATH: &str = "/chat/";
const DOCUMENTS_PATH: &str = "/chat/documents";

/// Request failure.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status.
    #[error("server error (HTTP {status}): {detail}")]
    Server { status: u16, detail: String },
    /// The request could not be sent or the response could not be read.
    #[error("connection failed: {0}")]
    Connect(String),
    /// A 2xx response whose body did not match the expected shape.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

impl ClientError {
    /// True when the backend itself reported the failure.
    pub fn is_server_reported(&self) -> bool {
        matches!(self, ClientError::Server { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Connect(e.to_string())
    }
}

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Build a client for `base_url` (e.g. `http://127.0.0.1:8000`). A trailing
    /// slash is ignored.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload one PDF as multipart field `file`.
    pub async fn upload(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<UploadResponse, ClientError> {
        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = self.url(UPLOAD_PATH);
        log::debug!("POST {} ({})", url, file_name);
        let resp = self.http.post(&url).multipart(form).send().await?;
        decode(resp).await
    }

    /// Ask a question. The text is sent as typed.
    pub async fn ask(&self, question: &str) -> Result<ChatResponse, ClientError> {
        let url = self.url(CHAT_PATH);
        log::debug!("POST {}", url);
        let resp = self
            .http
            .post(&url)
            .json(&ChatRequest::new(question))
            .send()
            .await?;
        decode(resp).await
    }

    /// Fetch the full document listing.
    pub async fn list_documents(&self) -> Result<DocumentListing, ClientError> {
        let url = self.url(DOCUMENTS_PATH);
        log::debug!("GET {}", url);
        let resp = self.http.get(&url).send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    let body = resp.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&body).map_err(|e| ClientError::InvalidBody(e.to_string()));
    }

    let detail = serde_json::from_slice::<ErrorDetail>(&body)
        .map(ErrorDetail::into_text)
        .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
    Err(ClientError::Server {
        status: status.as_u16(),
        detail,
    })
}
