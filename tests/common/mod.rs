#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use site_search::UiState;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

#[derive(Clone, Debug)]
pub enum Reply {
    Json(StatusCode, Value),
    Text(StatusCode, &'static str),
}

#[derive(Debug)]
pub struct Received {
    pub content_type: Option<String>,
    pub body: Value,
}

/// In-process stand-in for the backend search service.
#[derive(Clone)]
pub struct MockBackend {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    reply: Arc<Mutex<Reply>>,
    delay: Arc<Mutex<Duration>>,
    received: Arc<Mutex<Vec<Received>>>,
    watcher: Arc<Mutex<Option<watch::Receiver<UiState>>>>,
    observed: Arc<Mutex<Vec<UiState>>>,
}

impl MockBackend {
    pub async fn start(reply: Reply) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mock = MockBackend {
            base_url: format!("http://{}", addr),
            hits: Arc::new(AtomicUsize::new(0)),
            reply: Arc::new(Mutex::new(reply)),
            delay: Arc::new(Mutex::new(Duration::ZERO)),
            received: Arc::new(Mutex::new(Vec::new())),
            watcher: Arc::new(Mutex::new(None)),
            observed: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/api/search", post(handle_search))
            .with_state(mock.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        mock
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Records the controller state seen by each incoming request.
    pub fn watch(&self, rx: watch::Receiver<UiState>) {
        *self.watcher.lock().unwrap() = Some(rx);
    }

    pub fn observed(&self) -> Vec<UiState> {
        self.observed.lock().unwrap().clone()
    }

    pub fn take_received(&self) -> Vec<Received> {
        std::mem::take(&mut *self.received.lock().unwrap())
    }
}

async fn handle_search(
    State(mock): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    mock.received.lock().unwrap().push(Received {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let seen = mock
        .watcher
        .lock()
        .unwrap()
        .as_ref()
        .map(|rx| rx.borrow().clone());
    if let Some(state) = seen {
        mock.observed.lock().unwrap().push(state);
    }

    let delay = *mock.delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let reply = mock.reply.lock().unwrap().clone();
    match reply {
        Reply::Json(status, value) => (status, Json(value)).into_response(),
        Reply::Text(status, text) => (status, text).into_response(),
    }
}

/// An address nothing is listening on.
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
