//! In-process remote store for integration tests.

#![allow(dead_code)]

use applytrack::infrastructure::{AuthContext, MemoryTokenStore, TokenStore};
use applytrack::{Application, AuthClient, HttpGateway};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const PASSWORD: &str = "hunter2";
pub const TOKEN: &str = "tok-123";

#[derive(Default)]
pub struct ServerState {
    pub records: Vec<Application>,
    pub next_id: i64,
    /// `Authorization` header of every request, `None` when absent.
    pub auth_headers: Vec<Option<String>>,
    /// Status forced onto every collection request.
    pub fail_with: Option<StatusCode>,
    /// Answer list requests with an empty 200 body.
    pub empty_list_body: bool,
    /// Answer updates with an empty 200 body.
    pub empty_update_body: bool,
    /// Answer creates without an id.
    pub omit_created_id: bool,
    /// Answer list requests with this raw body.
    pub raw_list_body: Option<String>,
}

pub type Shared = Arc<Mutex<ServerState>>;

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl TestServer {
    pub async fn start(records: Vec<Application>) -> Self {
        let next_id = records.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
        let state = Arc::new(Mutex::new(ServerState {
            records,
            next_id,
            ..ServerState::default()
        }));

        let app = Router::new()
            .route("/applications", get(list).post(create))
            .route("/applications/:id", put(update).delete(remove))
            .route("/auth/login", post(login))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut ServerState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn gateway(&self, tokens: Arc<dyn TokenStore>) -> HttpGateway {
        HttpGateway::new(client(), &self.base_url(), AuthContext::new(tokens))
    }

    pub fn auth_client(&self, tokens: Arc<dyn TokenStore>) -> AuthClient {
        AuthClient::new(client(), &self.base_url(), tokens)
    }
}

pub fn client() -> reqwest::Client {
    applytrack::gateway::build_client(Duration::from_secs(5)).unwrap()
}

pub fn logged_in() -> Arc<dyn TokenStore> {
    Arc::new(MemoryTokenStore::with_token(TOKEN))
}

pub fn anonymous() -> Arc<dyn TokenStore> {
    Arc::new(MemoryTokenStore::new())
}

fn record_auth(state: &Shared, headers: &HeaderMap) -> Option<StatusCode> {
    let mut state = state.lock().unwrap();
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.auth_headers.push(header);
    state.fail_with
}

async fn list(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(status) = record_auth(&state, &headers) {
        return status.into_response();
    }
    let state = state.lock().unwrap();
    if state.empty_list_body {
        return StatusCode::OK.into_response();
    }
    if let Some(raw) = &state.raw_list_body {
        return (StatusCode::OK, raw.clone()).into_response();
    }
    Json(state.records.clone()).into_response()
}

async fn create(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(draft): Json<Application>,
) -> Response {
    if let Some(status) = record_auth(&state, &headers) {
        return status.into_response();
    }
    let mut state = state.lock().unwrap();
    let created = draft.with_id(state.next_id);
    state.next_id += 1;
    state.records.push(created.clone());
    if state.omit_created_id {
        let mut body = created;
        body.id = None;
        return (StatusCode::CREATED, Json(body)).into_response();
    }
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(application): Json<Application>,
) -> Response {
    if let Some(status) = record_auth(&state, &headers) {
        return status.into_response();
    }
    let mut state = state.lock().unwrap();
    let empty_body = state.empty_update_body;
    let Some(slot) = state.records.iter_mut().find(|r| r.id == Some(id)) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    *slot = application.clone();
    if empty_body {
        return StatusCode::OK.into_response();
    }
    Json(application).into_response()
}

async fn remove(State(state): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> Response {
    if let Some(status) = record_auth(&state, &headers) {
        return status.into_response();
    }
    let mut state = state.lock().unwrap();
    let before = state.records.len();
    state.records.retain(|r| r.id != Some(id));
    if state.records.len() == before {
        StatusCode::NOT_FOUND.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

#[derive(Deserialize)]
struct Login {
    email: String,
    password: String,
}

async fn login(Json(body): Json<Login>) -> Response {
    if body.password == PASSWORD && !body.email.is_empty() {
        Json(serde_json::json!({ "token": TOKEN })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

pub fn seed() -> Vec<Application> {
    vec![
        Application::new("Acme", "Engineer", "2024-01-02").with_id(1),
        Application::new("Globex", "Analyst", "2024-01-05T00:00:00Z")
            .with_id(2)
            .with_status(applytrack::ApplicationStatus::Offer),
    ]
}
