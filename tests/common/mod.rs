// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: token minting and an in-process fake backend.

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mindmate_client::{
    config::Config,
    models::User,
    storage::{MemoryStorage, Storage, StorageError},
    AppState,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

pub const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";
pub const TEST_EMAIL: &str = "sam@example.com";
pub const TEST_PASSWORD: &str = "correct horse";
/// Tokens for this subject are rejected by `/auth/me` with a 401.
pub const REVOKED_USER: &str = "revoked-user";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

#[allow(dead_code)]
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Create a signed test token expiring `expires_in` seconds from now.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, expires_in: i64) -> String {
    let now = now_secs();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + expires_in) as usize,
        iat: now as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .expect("Failed to create JWT")
}

#[allow(dead_code)]
pub fn test_user(id: &str, check_in_dates: Vec<String>) -> User {
    serde_json::from_value(json!({
        "id": id,
        "name": "Sam Rivera",
        "email": TEST_EMAIL,
        "check_in_dates": check_in_dates,
    }))
    .unwrap()
}

/// Memory storage whose writes or removals can be made to fail.
#[derive(Default)]
#[allow(dead_code)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_writes: AtomicBool,
    fail_removes: AtomicBool,
}

#[allow(dead_code)]
impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

fn disk_full() -> StorageError {
    StorageError::Io(std::io::Error::other("disk full"))
}

impl Storage for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(disk_full());
        }
        self.inner.set_many(entries)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(disk_full());
        }
        self.inner.remove_many(keys)
    }
}

/// A request as seen by the fake backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

pub type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

#[derive(Clone)]
struct BackendState {
    log: RequestLog,
    check_in_dates: Arc<Vec<String>>,
}

pub struct FakeBackend {
    pub base_url: String,
    pub log: RequestLog,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().unwrap().clone()
    }
}

/// Start the fake MindMate API on a random local port.
///
/// The logged-in user's `check_in_dates` are `check_in_dates`.
#[allow(dead_code)]
pub async fn spawn_backend(check_in_dates: Vec<String>) -> FakeBackend {
    let state = BackendState {
        log: Arc::new(Mutex::new(Vec::new())),
        check_in_dates: Arc::new(check_in_dates),
    };

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/me", get(me))
        .route("/crisis/signal", post(no_content))
        .route("/users/streak-data", put(empty_ok))
        .route("/checkins/", get(list_checkins).post(echo))
        .route("/chat/history", get(chat_history))
        .route("/insights/", get(insights_down))
        .route("/dashboard/", get(not_json))
        .route("/users/stats", get(plain_error))
        .route("/emergency/resources", get(resources))
        .fallback(not_found);

    let app = Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind random port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeBackend {
        base_url: format!("http://{}/api", addr),
        log: state.log,
    }
}

/// Client state wired to `base_url` over in-memory storage.
#[allow(dead_code)]
pub fn test_state(base_url: &str, storage: Arc<dyn Storage>) -> AppState {
    let config = Config {
        api_base: base_url.to_string(),
        ..Config::default()
    };
    AppState::new(config, storage)
}

async fn record(State(state): State<BackendState>, request: Request, next: Next) -> Response {
    let recorded = {
        let header_str = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: request.method().to_string(),
            uri: request.uri().to_string(),
            authorization: header_str(header::AUTHORIZATION),
            content_type: header_str(header::CONTENT_TYPE),
        }
    };
    state.log.lock().unwrap().push(recorded);
    next.run(request).await
}

fn user_json(state: &BackendState, id: &str) -> Value {
    json!({
        "id": id,
        "name": "Sam Rivera",
        "email": TEST_EMAIL,
        "timezone": "UTC",
        "check_in_dates": *state.check_in_dates,
    })
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(state): State<BackendState>, Json(body): Json<LoginBody>) -> Response {
    if body.email != TEST_EMAIL || body.password != TEST_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect email or password" })),
        )
            .into_response();
    }

    Json(json!({
        "access_token": create_test_jwt("user-1", 3600),
        "token_type": "bearer",
        "user": user_json(&state, "user-1"),
    }))
    .into_response()
}

#[derive(Deserialize)]
struct SignupBody {
    name: String,
    email: String,
}

async fn signup(Json(body): Json<SignupBody>) -> Response {
    if body.email == TEST_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Email already registered" })),
        )
            .into_response();
    }

    Json(json!({
        "access_token": create_test_jwt("user-2", 3600),
        "token_type": "bearer",
        "user": { "id": "user-2", "name": body.name, "email": body.email },
    }))
    .into_response()
}

fn verified_subject(headers: &HeaderMap) -> Option<String> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(SIGNING_KEY),
        &Validation::new(Algorithm::HS256),
    )
    .ok()?;
    Some(data.claims.sub)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Could not validate credentials" })),
    )
        .into_response()
}

async fn me(State(state): State<BackendState>, headers: HeaderMap) -> Response {
    match verified_subject(&headers) {
        Some(sub) if sub != REVOKED_USER => Json(user_json(&state, &sub)).into_response(),
        _ => unauthorized(),
    }
}

async fn list_checkins() -> Json<Value> {
    Json(json!([{ "id": "c1", "mood": "good" }, { "id": "c2", "mood": "low" }]))
}

async fn echo(body: Bytes) -> Response {
    match serde_json::from_slice::<Value>(&body) {
        Ok(value) => Json(json!({ "id": "new", "received": value })).into_response(),
        Err(_) => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

async fn chat_history() -> Json<Value> {
    Json(json!({
        "data": [
            { "id": "1", "user_message": "Hi", "ai_response": "Hello there" },
            { "id": "2", "user_message": "   ", "ai_response": "" },
            { "id": "3", "user_message": null, "ai_response": "Take a breath" }
        ]
    }))
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn empty_ok() -> StatusCode {
    StatusCode::OK
}

async fn insights_down() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Insight engine down" })),
    )
        .into_response()
}

async fn not_json() -> &'static str {
    "<html>maintenance</html>"
}

async fn plain_error() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "upstream unavailable").into_response()
}

async fn resources(request: Request) -> Json<Value> {
    Json(json!({ "query": request.uri().query() }))
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" }))).into_response()
}
