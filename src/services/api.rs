// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MindMate API client.
//!
//! Handles:
//! - Bearer token attachment (read fresh from storage on every call)
//! - Session teardown on local expiry or a 401 from the server
//! - Error body normalization into `ClientError::Api`
//! - One typed method per backend endpoint
//!
//! No retries and no timeouts beyond the transport's own.

use crate::auth::{EndReason, SessionManager};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{
    AuthResponse, BreathingSessionRequest, ChatMessageRequest, ChatReply, CheckinRequest,
    Conversation, FoodLogRequest, JournalEntryRequest, ListPayload, LoginRequest, SignupRequest,
    User,
};
use crate::time_utils::{format_utc_rfc3339, now_unix_secs};
use chrono::Utc;
use reqwest::{header::CONTENT_TYPE, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Fields checked, in order, for a human-readable error message.
const ERROR_FIELDS: [&str; 3] = ["detail", "message", "error"];

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionManager>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn from_config(config: &Config, session: Arc<SessionManager>) -> Self {
        Self::new(config.api_base.clone(), session)
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ─── Request execution ───────────────────────────────────────────────────

    /// Send an authenticated request and decode the JSON response.
    ///
    /// Fails with `SessionExpired` (after ending the session) when there is
    /// no usable token or the server answers 401. If the session cannot be
    /// cleared after a 401, the `Storage` error is returned instead.
    pub async fn call<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // An unusable token has already been cleared by the session.
        let Some(token) = self.session.usable_token_at(now_unix_secs()) else {
            return Err(ClientError::SessionExpired);
        };

        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "API request");

        let mut request = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %url, "Server rejected session (401)");
            self.session.end(EndReason::Rejected)?;
            return Err(ClientError::SessionExpired);
        }

        parse_response(response).await
    }

    /// Send a request that needs no session (login, signup).
    ///
    /// A 401 here is an ordinary `ClientError::Api` (e.g. wrong password).
    pub async fn call_public<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "API request (public)");

        let mut request = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        parse_response(request.send().await?).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call::<(), T>(Method::GET, path, None).await
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let payload: ListPayload<T> = self.get(path).await?;
        Ok(payload.into_vec())
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.call(Method::POST, path, Some(body)).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.call(Method::PUT, path, Some(body)).await
    }

    // ─── Authentication ──────────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.call_public(Method::POST, "/auth/login", Some(&body)).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        self.call_public(Method::POST, "/auth/signup", Some(request)).await
    }

    /// Log in and persist the returned session.
    pub async fn login_and_store(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let response = self.login(email, password).await?;
        self.session.login_succeeded(&response.access_token, &response.user)?;
        Ok(response)
    }

    /// Sign up and persist the returned session.
    pub async fn signup_and_store(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let response = self.signup(request).await?;
        self.session.login_succeeded(&response.access_token, &response.user)?;
        Ok(response)
    }

    /// Confirm the stored session with the server.
    pub async fn current_user(&self) -> Result<User> {
        self.get("/auth/me").await
    }

    // ─── Check-ins ───────────────────────────────────────────────────────────

    pub async fn save_checkin(&self, checkin: &CheckinRequest) -> Result<Value> {
        self.post("/checkins/", checkin).await
    }

    pub async fn get_checkins(&self, limit: u32) -> Result<Vec<Value>> {
        self.get_list(&format!("/checkins/?limit={}", limit)).await
    }

    pub async fn get_checkin(&self, checkin_id: &str) -> Result<Value> {
        self.get(&format!("/checkins/{}", urlencoding::encode(checkin_id))).await
    }

    // ─── Food logs ───────────────────────────────────────────────────────────

    pub async fn save_food_log(&self, food_log: &FoodLogRequest) -> Result<Value> {
        self.post("/food-logs/", food_log).await
    }

    pub async fn get_food_logs(&self, limit: u32) -> Result<Vec<Value>> {
        self.get_list(&format!("/food-logs/?limit={}", limit)).await
    }

    // ─── Journal ─────────────────────────────────────────────────────────────

    pub async fn save_journal_entry(&self, entry: &JournalEntryRequest) -> Result<Value> {
        self.post("/journal-entries/", entry).await
    }

    pub async fn get_journal_entries(&self, limit: u32) -> Result<Vec<Value>> {
        self.get_list(&format!("/journal-entries/?limit={}", limit)).await
    }

    pub async fn get_journal_entry(&self, entry_id: &str) -> Result<Value> {
        self.get(&format!("/journal-entries/{}", urlencoding::encode(entry_id))).await
    }

    // ─── Chat ────────────────────────────────────────────────────────────────

    pub async fn send_chat_message(
        &self,
        message: &str,
        context: Option<Value>,
    ) -> Result<ChatReply> {
        let body = ChatMessageRequest {
            message: message.trim().to_string(),
            context,
        };
        self.post("/chat", &body).await
    }

    /// Chat history, without exchanges that have no text on either side.
    pub async fn chat_history(&self, limit: u32) -> Result<Vec<Conversation>> {
        let history: Vec<Conversation> = self
            .get_list(&format!("/chat/history?limit={}", limit))
            .await?;
        Ok(history.into_iter().filter(|c| c.has_content()).collect())
    }

    // ─── Insights ────────────────────────────────────────────────────────────

    pub async fn insights(&self, days: u32) -> Result<Value> {
        self.get(&format!("/insights/?days={}", days)).await
    }

    pub async fn mood_trends(&self, days: u32) -> Result<Value> {
        self.get(&format!("/insights/mood-trends?days={}", days)).await
    }

    pub async fn recommendations(&self) -> Result<Value> {
        self.get("/insights/recommendations").await
    }

    // ─── Profile & stats ─────────────────────────────────────────────────────

    pub async fn update_profile(&self, profile: &Value) -> Result<Value> {
        self.put("/users/profile", profile).await
    }

    pub async fn update_preferences(&self, preferences: &[String]) -> Result<Value> {
        self.put(
            "/users/preferences",
            &serde_json::json!({ "preferences": preferences }),
        )
        .await
    }

    pub async fn dashboard(&self) -> Result<Value> {
        self.get("/dashboard/").await
    }

    pub async fn user_stats(&self, period: &str) -> Result<Value> {
        self.get(&format!("/users/stats?period={}", urlencoding::encode(period))).await
    }

    pub async fn detailed_user_stats(&self, period: &str) -> Result<Value> {
        self.get(&format!(
            "/users/detailed-stats?period={}",
            urlencoding::encode(period)
        ))
        .await
    }

    pub async fn dashboard_stats(&self, days: u32) -> Result<Value> {
        self.get(&format!("/users/dashboard-stats?days={}", days)).await
    }

    pub async fn streak_data(&self) -> Result<Value> {
        self.get("/users/streak-data").await
    }

    pub async fn update_streak_data(&self, streak_data: &Value) -> Result<Value> {
        self.put("/users/streak-data", streak_data).await
    }

    // ─── Crisis support ──────────────────────────────────────────────────────

    pub async fn report_crisis_signal(&self, signal: &Value) -> Result<Value> {
        self.post("/crisis/signal", signal).await
    }

    pub async fn emergency_resources(&self, location: Option<&str>) -> Result<Value> {
        let path = match location {
            Some(location) => format!(
                "/emergency/resources?location={}",
                urlencoding::encode(location)
            ),
            None => "/emergency/resources".to_string(),
        };
        self.get(&path).await
    }

    // ─── Breathing ───────────────────────────────────────────────────────────

    pub async fn save_breathing_session(
        &self,
        technique: &str,
        duration_seconds: u32,
        completed: bool,
    ) -> Result<Value> {
        let body = BreathingSessionRequest {
            technique: technique.to_string(),
            duration_seconds,
            completed,
            session_date: format_utc_rfc3339(Utc::now()),
        };
        self.post("/breathing-sessions/", &body).await
    }

    pub async fn get_breathing_sessions(&self, limit: u32) -> Result<Vec<Value>> {
        self.get_list(&format!("/breathing-sessions/?limit={}", limit)).await
    }
}

/// Check response status and decode the JSON body.
async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = error_message(&bytes)
            .unwrap_or_else(|| ClientError::generic_http_message(status.as_u16()));
        tracing::warn!(status = status.as_u16(), message = %message, "API error");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body: &[u8] = if status == StatusCode::NO_CONTENT && bytes.is_empty() {
        b"null"
    } else {
        &bytes
    };

    serde_json::from_slice(body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

/// Pull a message out of an error body such as `{"detail": "..."}`.
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ERROR_FIELDS.iter().find_map(|field| {
        let message = value.get(field)?.as_str()?.trim();
        (!message.is_empty()).then(|| message.to_string())
    })
}
