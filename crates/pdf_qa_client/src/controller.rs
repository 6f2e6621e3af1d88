//! View controller: holds the client, the view and the selected file, and runs
//! one handler per user action.

use std::path::{Path, PathBuf};

use crate::client::{Client, ClientError};
use crate::view::{self, Region, Tone, View};

/// One user action. Each maps to exactly one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Choose the file the next `Upload` sends.
    Select(PathBuf),
    Upload,
    Ask(String),
    ListDocuments,
    /// Session start; loads the document list once.
    Load,
}

/// How a handler finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Input was rejected before any request was sent.
    Rejected,
    Succeeded,
    Failed,
}

pub struct Controller<V: View> {
    client: Client,
    view: V,
    selected_file: Option<PathBuf>,
}

impl<V: View> Controller<V> {
    pub fn new(client: Client, view: V) -> Self {
        Self {
            client,
            view,
            selected_file: None,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.selected_file = Some(path.into());
    }

    pub async fn dispatch(&mut self, action: Action) -> Outcome {
        match action {
            Action::Select(path) => {
                self.select_file(path);
                Outcome::Succeeded
            }
            Action::Upload => self.upload().await,
            Action::Ask(question) => self.ask(&question).await,
            Action::ListDocuments | Action::Load => self.load_documents().await,
        }
    }

    /// Upload the selected file. On success the selection is cleared and the
    /// document list refreshed.
    pub async fn upload(&mut self) -> Outcome {
        let path = match &self.selected_file {
            Some(p) => p.clone(),
            None => {
                self.view.alert(view::NO_FILE_SELECTED);
                return Outcome::Rejected;
            }
        };

        let contents = match tokio::fs::read(&path).await {
            Ok(c) => c,
            Err(e) => {
                self.view
                    .alert(&format!("Could not read {}: {}", path.display(), e));
                return Outcome::Rejected;
            }
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".into());

        self.view
            .show(Region::UploadStatus, Tone::Loading, view::UPLOADING);

        match self.client.upload(&file_name, contents).await {
            Ok(resp) => {
                log::info!("upload succeeded: {} -> {}", file_name, resp.document_id);
                self.view.show(
                    Region::UploadStatus,
                    Tone::Success,
                    &view::render_upload_success(&resp),
                );
                self.selected_file = None;
                self.load_documents().await;
                Outcome::Succeeded
            }
            Err(e) => {
                log::error!("upload of {} failed: {}", file_name, e);
                let text = match &e {
                    ClientError::Server { detail, .. } => view::upload_failed(detail),
                    _ => view::UPLOAD_UNREACHABLE.to_string(),
                };
                self.view.show(Region::UploadStatus, Tone::Error, &text);
                Outcome::Failed
            }
        }
    }

    /// Ask `question`. Whitespace-only input is rejected.
    pub async fn ask(&mut self, question: &str) -> Outcome {
        if question.trim().is_empty() {
            self.view.alert(view::EMPTY_QUESTION);
            return Outcome::Rejected;
        }

        self.view.show(Region::Response, Tone::Loading, view::THINKING);

        match self.client.ask(question).await {
            Ok(resp) => {
                log::debug!("chat response: {:?}", resp);
                self.view.show(
                    Region::Response,
                    Tone::Success,
                    &view::render_chat_answer(&resp),
                );
                Outcome::Succeeded
            }
            Err(e) => {
                log::error!("chat request failed: {}", e);
                let text = match &e {
                    ClientError::Server { detail, .. } => view::chat_failed(detail),
                    _ => view::chat_unreachable(self.client.base_url()),
                };
                self.view.show(Region::Response, Tone::Error, &text);
                Outcome::Failed
            }
        }
    }

    /// Fetch and render the full document listing.
    pub async fn load_documents(&mut self) -> Outcome {
        let listing = match self.client.list_documents().await {
            Ok(listing) => listing,
            Err(e) => {
                log::error!("loading documents failed: {}", e);
                self.view
                    .show(Region::Documents, Tone::Error, view::DOCUMENTS_ERROR);
                return Outcome::Failed;
            }
        };

        log::debug!("listing has {} documents", listing.count);
        match view::render_documents(&listing) {
            Some(text) => {
                self.view.show(Region::Documents, Tone::Success, &text);
                Outcome::Succeeded
            }
            None => {
                log::error!("listing reports {} documents but has no list", listing.count);
                self.view
                    .show(Region::Documents, Tone::Error, view::DOCUMENTS_ERROR);
                Outcome::Failed
            }
        }
    }
}
