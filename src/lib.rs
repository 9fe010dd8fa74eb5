// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! MindMate client: session and streak handling for the MindMate wellness app
//!
//! This crate keeps the bearer-token session in local storage, wraps calls
//! to the MindMate REST API, and computes check-in streaks and
//! celebrations locally.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod time_utils;

use auth::{ExpiryPolicy, SessionManager};
use config::Config;
use services::{ApiClient, StreakCelebrations};
use std::sync::Arc;
use storage::Storage;

/// Shared client state handed to the UI layer.
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub api: ApiClient,
    pub celebrations: StreakCelebrations,
}

impl AppState {
    /// Wire the session, API client and celebration tracker over one storage.
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let session = Arc::new(SessionManager::new(
            storage.clone(),
            ExpiryPolicy::from_config(&config),
        ));
        let api = ApiClient::from_config(&config, session.clone());
        let celebrations = StreakCelebrations::new(storage);

        Self {
            config,
            session,
            api,
            celebrations,
        }
    }
}
