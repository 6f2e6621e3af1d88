//! In-process fake backend serving `/upload/`, `/chat/` and `/chat/documents`
//! on an ephemeral port. Counts requests and records what it received.
#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::TcpListener as StdTcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Canned replies, each a status code and a JSON body.
#[derive(Clone)]
pub struct Replies {
    pub upload: (u16, Value),
    pub chat: (u16, Value),
    pub documents: (u16, Value),
}

impl Default for Replies {
    fn default() -> Self {
        Self {
            upload: (
                200,
                json!({"message": "PDF uploaded successfully", "document_id": "doc-123"}),
            ),
            chat: (
                200,
                json!({
                    "answer": "The warranty lasts two years.",
                    "sources": ["a.pdf", "b.pdf"],
                    "matches": 3,
                    "top_similarity": 0.873
                }),
            ),
            documents: (
                200,
                json!({
                    "count": 1,
                    "documents": [
                        {"filename": "a.pdf", "uploaded_at": "2024-03-01T10:00:00", "chunk_count": 4}
                    ]
                }),
            ),
        }
    }
}

#[derive(Default)]
pub struct Recorded {
    pub uploads: AtomicUsize,
    pub chats: AtomicUsize,
    pub listings: AtomicUsize,
    /// (file name, content type, byte length) of the last uploaded `file` field.
    pub last_upload: Mutex<Option<(String, String, usize)>>,
    pub last_chat_body: Mutex<Option<Value>>,
}

impl Recorded {
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn chats(&self) -> usize {
        self.chats.load(Ordering::SeqCst)
    }

    pub fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }
}

struct Shared {
    replies: Replies,
    recorded: Arc<Recorded>,
}

pub struct Backend {
    pub base_url: String,
    pub recorded: Arc<Recorded>,
}

fn reply((status, body): &(u16, Value)) -> (StatusCode, Json<Value>) {
    (
        StatusCode::from_u16(*status).unwrap(),
        Json(body.clone()),
    )
}

async fn upload(
    State(shared): State<Arc<Shared>>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    shared.recorded.uploads.fetch_add(1, Ordering::SeqCst);
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        *shared.recorded.last_upload.lock().unwrap() = Some((name, content_type, bytes.len()));
    }
    reply(&shared.replies.upload)
}

async fn chat(State(shared): State<Arc<Shared>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    shared.recorded.chats.fetch_add(1, Ordering::SeqCst);
    *shared.recorded.last_chat_body.lock().unwrap() = Some(body);
    reply(&shared.replies.chat)
}

async fn documents(State(shared): State<Arc<Shared>>) -> (StatusCode, Json<Value>) {
    shared.recorded.listings.fetch_add(1, Ordering::SeqCst);
    reply(&shared.replies.documents)
}

fn router(replies: Replies, recorded: Arc<Recorded>) -> Router {
    Router::new()
        .route("/upload/", post(upload))
        .route("/chat/", post(chat))
        .route("/chat/documents", get(documents))
        .with_state(Arc::new(Shared { replies, recorded }))
}

/// Start the backend on the current tokio runtime.
pub async fn spawn_backend(replies: Replies) -> Backend {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let recorded = Arc::new(Recorded::default());
    let app = router(replies, recorded.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Backend {
        base_url: format!("http://127.0.0.1:{}", port),
        recorded,
    }
}

/// Start the backend on its own thread and runtime, for tests that run the
/// binary synchronously. Lives until the test process exits.
pub fn spawn_backend_thread(replies: Replies) -> Backend {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let backend = spawn_backend(replies).await;
            tx.send(backend).unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}

/// A base URL where nothing is listening.
pub fn unreachable_base_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    format!("http://127.0.0.1:{}", port)
}

/// Write a small PDF-looking file and return its path.
pub fn write_pdf(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"%PDF-1.4\n% test document\n%%EOF\n").unwrap();
    path
}
