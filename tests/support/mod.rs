// In-process mock backend shared by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use serde_json::Value;
use tokio::sync::{Semaphore, mpsc};

use ride_client::domain::ports::SessionStorage;
use ride_client::interface_adapters::storage::MemoryStorage;
use ride_client::{ApiGateway, SessionManager};

// Every gateway under test talks to `<server>/api`, like the real backend.
pub const API_PREFIX: &str = "/api";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path_and_query: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body should be json")
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: Some("application/json"),
            body: body.to_string(),
        }
    }

    pub fn raw_json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("application/json"),
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("text/plain"),
            body: body.to_string(),
        }
    }
}

struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    replies: Mutex<HashMap<(String, String), Reply>>,
    held: Mutex<HashSet<String>>,
    gate: Semaphore,
    arrivals: mpsc::UnboundedSender<String>,
}

pub struct MockBackend {
    pub server_url: String,
    state: Arc<MockState>,
    arrivals: tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>,
}

impl MockBackend {
    // Binds an ephemeral port and serves until the test runtime shuts down.
    pub async fn start() -> Self {
        let (arrivals_tx, arrivals_rx) = mpsc::unbounded_channel();
        let state = Arc::new(MockState {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(HashMap::new()),
            held: Mutex::new(HashSet::new()),
            gate: Semaphore::new(0),
            arrivals: arrivals_tx,
        });

        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral test port");
        let addr = listener.local_addr().expect("get local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend failed");
        });

        Self {
            server_url: format!("http://{addr}"),
            state,
            arrivals: tokio::sync::Mutex::new(arrivals_rx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}{API_PREFIX}", self.server_url)
    }

    pub fn reply(&self, method: &str, path: &str, reply: Reply) {
        self.state
            .replies
            .lock()
            .expect("replies mutex poisoned")
            .insert((method.to_string(), path.to_string()), reply);
    }

    // Requests to `path` wait until `release` lets them through.
    pub fn hold(&self, path: &str) {
        self.state
            .held
            .lock()
            .expect("held mutex poisoned")
            .insert(path.to_string());
    }

    pub fn release(&self, count: usize) {
        self.state.gate.add_permits(count);
    }

    pub async fn next_arrival(&self) -> String {
        self.arrivals
            .lock()
            .await
            .recv()
            .await
            .expect("mock backend stopped")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("requests mutex poisoned")
            .clone()
    }
}

async fn handle(State(state): State<Arc<MockState>>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let method = parts.method.to_string();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    let path_and_query = path_and_query
        .strip_prefix(API_PREFIX)
        .unwrap_or(&path_and_query)
        .to_string();
    let path = path_and_query
        .split('?')
        .next()
        .unwrap_or_default()
        .to_string();
    let authorization = header_value(&parts.headers, header::AUTHORIZATION);
    let content_type = header_value(&parts.headers, header::CONTENT_TYPE);
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("read request body");

    state
        .requests
        .lock()
        .expect("requests mutex poisoned")
        .push(RecordedRequest {
            method: method.clone(),
            path_and_query,
            authorization,
            content_type,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });

    let is_held = state
        .held
        .lock()
        .expect("held mutex poisoned")
        .contains(&path);
    if is_held {
        let _ = state.arrivals.send(path.clone());
        state.gate.acquire().await.expect("gate closed").forget();
    }

    let reply = state
        .replies
        .lock()
        .expect("replies mutex poisoned")
        .get(&(method, path))
        .cloned()
        .unwrap_or_else(|| Reply::json(404, serde_json::json!({"message": "no route"})));

    let mut builder = Response::builder()
        .status(StatusCode::from_u16(reply.status).expect("valid status"));
    if let Some(content_type) = reply.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(reply.body)).expect("valid response")
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

// A gateway wired to a fresh in-memory session, as the binary wires it to disk.
pub fn client_for(backend: &MockBackend) -> (ApiGateway, Arc<SessionManager>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let session = Arc::new(SessionManager::new(
        Arc::clone(&storage) as Arc<dyn SessionStorage>
    ));
    let gateway = ApiGateway::new(backend.base_url(), session.clone());
    (gateway, session, storage)
}
