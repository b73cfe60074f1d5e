use axum::{Json, Router};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "secret";
/// `Basic` header for `user:secret`.
const EXPECTED_AUTHORIZATION: &str = "Basic dXNlcjpzZWNyZXQ=";

#[derive(Debug, Clone, Default)]
struct StubState {
    routes: Arc<Mutex<HashMap<String, (u16, Value)>>>,
    requests: Arc<AtomicUsize>,
}

/// Local stand-in for the Bitbucket 1.0 API.
///
/// Unknown paths answer 404 and requests without the expected basic-auth
/// header answer 401.
#[derive(Debug)]
pub struct StubServer {
    base_url: String,
    state: StubState,
    task: tokio::task::JoinHandle<()>,
}

impl StubServer {
    pub async fn start() -> Self {
        let state = StubState::default();
        let app = Router::new().fallback(answer).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Stub server has no address");
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Stub server stopped unexpectedly");
        });

        StubServer {
            base_url: format!("http://{addr}"),
            state,
            task,
        }
    }

    pub fn api_base(&self) -> String {
        format!("{}/api/1.0", self.base_url)
    }

    pub fn respond(&self, path: &str, status: u16, body: Value) {
        self.state
            .routes
            .lock()
            .expect("Stub routes poisoned")
            .insert(path.to_string(), (status, body));
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn answer(State(state): State<StubState>, uri: Uri, headers: HeaderMap) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if authorization != Some(EXPECTED_AUTHORIZATION) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let route = state
        .routes
        .lock()
        .expect("Stub routes poisoned")
        .get(uri.path())
        .cloned();
    match route {
        Some((status, body)) => {
            let status = StatusCode::from_u16(status).expect("Invalid stub status");
            (status, Json(body)).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
