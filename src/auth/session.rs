// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle.
//!
//! `SessionManager` is the single answer to "is the user logged in right
//! now" and the only component that ends a session. It is shared by
//! reference (`Arc`) between the UI layer and the API client; all writes
//! to the token and user entries go through its `TokenStore`.
//!
//! ```text
//! NoSession --login_succeeded--> Active
//! Active --expiry | logout() | 401--> NoSession
//! ```

use crate::auth::store::TokenStore;
use crate::auth::token::{self, ExpiryPolicy};
use crate::error::{ClientError, Result};
use crate::models::User;
use crate::storage::{Storage, StorageError};
use crate::time_utils::now_unix_secs;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NoSession,
    Active,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Explicit sign-out.
    LoggedOut,
    /// Token expired or could not be decoded.
    Expired,
    /// The server answered 401.
    Rejected,
}

/// Transitions pushed to subscribers (normally the UI layer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Started { user_id: String },
    Ended { reason: EndReason },
}

pub struct SessionManager {
    store: TokenStore,
    policy: ExpiryPolicy,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn Storage>, policy: ExpiryPolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store: TokenStore::new(storage),
            policy,
            events,
        }
    }

    /// Subscribe to session start/end events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Startup gate. Local only; never touches the network.
    ///
    /// Clears storage and returns `false` when the stored session is
    /// missing, half-written, undecodable or expired.
    pub fn init(&self) -> bool {
        self.init_at(now_unix_secs())
    }

    pub fn init_at(&self, now: i64) -> bool {
        let active = self.is_valid_at(now);
        if active {
            tracing::info!(user_id = ?self.user_id_at(now), "Restored session");
        } else {
            tracing::info!("No usable session");
        }
        active
    }

    /// Re-run the local validity check, ending the session if it failed.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_unix_secs())
    }

    pub fn is_valid_at(&self, now: i64) -> bool {
        self.usable_token_at(now).is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.is_valid() {
            SessionState::Active
        } else {
            SessionState::NoSession
        }
    }

    /// Current bearer token if the session is usable at `now`.
    ///
    /// Read fresh from storage on every call.
    pub fn usable_token_at(&self, now: i64) -> Option<String> {
        let stored = match self.store.read() {
            Ok(stored) => stored,
            Err(err) => {
                tracing::error!(error = %err, "Failed to read session storage");
                return None;
            }
        };

        match stored {
            Some(session) => match self.policy.usable_claims(&session.token, now) {
                Some(_) => Some(session.token),
                None => {
                    self.end_quietly(EndReason::Expired);
                    None
                }
            },
            None => {
                // A lone token or user entry is never a session.
                self.end_quietly(EndReason::Expired);
                None
            }
        }
    }

    /// Record a successful login or signup.
    pub fn login_succeeded(&self, token: &str, user: &User) -> Result<()> {
        self.store.save(token, user)?;
        tracing::info!(user_id = %user.id, "Session started");
        let _ = self.events.send(SessionEvent::Started {
            user_id: user.id.clone(),
        });
        Ok(())
    }

    /// End the session. Safe to call with no session stored.
    ///
    /// Fails if the stored entries could not be removed; the session is
    /// then still stored and no `Ended` event is sent.
    pub fn logout(&self) -> Result<()> {
        self.end(EndReason::LoggedOut)?;
        Ok(())
    }

    /// Clear storage and notify subscribers if anything was stored.
    ///
    /// `Ended` is sent only once both entries are gone.
    pub(crate) fn end(&self, reason: EndReason) -> std::result::Result<(), StorageError> {
        if !self.store.has_any()? {
            return Ok(());
        }

        self.store.clear()?;

        tracing::info!(reason = ?reason, "Session ended");
        let _ = self.events.send(SessionEvent::Ended { reason });
        Ok(())
    }

    /// `end` for paths that only answer "usable or not".
    fn end_quietly(&self, reason: EndReason) {
        if let Err(err) = self.end(reason) {
            tracing::error!(error = %err, reason = ?reason, "Failed to clear session storage");
        }
    }

    /// Stored user, while the session is usable.
    pub fn current_user(&self) -> Option<User> {
        if !self.is_valid() {
            return None;
        }
        self.store.read().ok().flatten().map(|s| s.user)
    }

    /// Replace the stored user record (e.g. after a profile update).
    pub fn update_user(&self, user: &User) -> Result<()> {
        if !self.is_valid() {
            return Err(ClientError::SessionExpired);
        }
        user.check()?;
        self.store.save_user(user)?;
        Ok(())
    }

    /// Subject claim of a usable token. Display/debugging only.
    pub fn user_id(&self) -> Option<String> {
        self.user_id_at(now_unix_secs())
    }

    pub fn user_id_at(&self, now: i64) -> Option<String> {
        let token = self.store.token().ok().flatten()?;
        let claims = self.policy.usable_claims(&token, now)?;
        token::extract_user_id(&claims).map(str::to_string)
    }

    /// True when the usable token is close enough to expiry that the user
    /// should be asked to sign in again soon.
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh_at(now_unix_secs())
    }

    pub fn needs_refresh_at(&self, now: i64) -> bool {
        let Some(token) = self.store.token().ok().flatten() else {
            return false;
        };
        self.policy
            .usable_claims(&token, now)
            .is_some_and(|claims| self.policy.needs_refresh(&claims, now))
    }
}
