//! Display side: the `View` trait handlers render into, the text each outcome
//! renders as, and a terminal implementation.

use std::io::Write;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::messages::{ChatResponse, DocumentListing, UploadResponse};

pub const UPLOADING: &str = "Uploading and processing...";
pub const THINKING: &str = "Thinking...";
pub const NO_FILE_SELECTED: &str = "Please choose a PDF file first!";
pub const EMPTY_QUESTION: &str = "Please enter a question!";
pub const UPLOAD_UNREACHABLE: &str = "Failed to connect to server. Is the backend running?";
pub const NO_DOCUMENTS: &str = "No documents uploaded yet.";
pub const DOCUMENTS_ERROR: &str = "Error loading documents";
pub const INVALID_DATE: &str = "Invalid Date";

/// Independently updated display areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    UploadStatus,
    Response,
    Documents,
}

/// How a region's content should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Loading,
    Success,
    Error,
}

/// Render target for the controller. Each call replaces the region's content.
pub trait View {
    fn show(&mut self, region: Region, tone: Tone, text: &str);

    /// Blocking notice for input that was rejected before any request.
    fn alert(&mut self, message: &str);
}

pub fn upload_failed(detail: &str) -> String {
    format!("Upload failed: {}", detail)
}

pub fn chat_failed(detail: &str) -> String {
    format!("Error: {}", detail)
}

pub fn chat_unreachable(base_url: &str) -> String {
    format!(
        "Failed to reach server. Make sure the backend is running at {}.",
        base_url
    )
}

pub fn render_upload_success(resp: &UploadResponse) -> String {
    format!("{}\nDocument ID: {}", resp.message, resp.document_id_text())
}

/// `0.873` → `87.3%`.
pub fn format_similarity(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

pub fn render_chat_answer(resp: &ChatResponse) -> String {
    let mut out = format!("Answer:\n\n{}", resp.answer);

    if !resp.sources.is_empty() {
        out.push_str("\n\nSources: ");
        out.push_str(&resp.sources.join(", "));
    }

    out.push_str(&format!("\n\nFound {} relevant chunks", resp.matches));
    // A zero score carries no information and is omitted.
    if let Some(score) = resp.top_similarity.filter(|s| *s != 0.0) {
        out.push_str(" | Best match: ");
        out.push_str(&format_similarity(score));
    }
    out
}

/// Local-time rendering of an ISO-8601 timestamp. Naive values are UTC.
pub fn format_uploaded_at(raw: &str) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(FORMAT).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc().with_timezone(&Local).format(FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return naive.and_utc().with_timezone(&Local).format(FORMAT).to_string();
        }
    }
    INVALID_DATE.to_string()
}

/// Full rendering of a listing; replaces whatever was shown before. `None`
/// when the reply claims documents but carries no list.
pub fn render_documents(listing: &DocumentListing) -> Option<String> {
    if listing.count == 0 {
        return Some(NO_DOCUMENTS.to_string());
    }

    let documents = listing.documents.as_ref()?;
    let items = documents
        .iter()
        .enumerate()
        .map(|(i, doc)| {
            format!(
                "{}. {}\n   Uploaded: {} | Chunks: {}",
                i + 1,
                doc.filename,
                format_uploaded_at(&doc.uploaded_at),
                doc.chunk_count.unwrap_or(0)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(items)
}

/// Writes successful renderings to `out`; loading notices, errors and alerts
/// go to `err`.
pub struct TerminalView<O: Write, E: Write> {
    out: O,
    err: E,
}

impl TerminalView<std::io::Stdout, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write, E: Write> TerminalView<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> View for TerminalView<O, E> {
    fn show(&mut self, region: Region, tone: Tone, text: &str) {
        let result = match tone {
            Tone::Success => writeln!(self.out, "{}", text).and_then(|_| self.out.flush()),
            Tone::Loading | Tone::Error => {
                log::trace!("{:?} region -> {:?}", region, tone);
                writeln!(self.err, "{}", text).and_then(|_| self.err.flush())
            }
        };
        if let Err(e) = result {
            log::warn!("failed to write to terminal: {}", e);
        }
    }

    fn alert(&mut self, message: &str) {
        if let Err(e) = writeln!(self.err, "! {}", message) {
            log::warn!("failed to write to terminal: {}", e);
        }
    }
}
