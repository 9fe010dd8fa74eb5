// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login and signup bodies.

use super::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub preferences: Vec<String>,
}

/// Response to a successful login or signup.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Three-segment bearer token carrying `sub` and `exp` claims
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}
