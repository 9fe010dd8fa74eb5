// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence of the bearer token and user record.

use crate::models::User;
use crate::storage::{keys, Storage, StorageError};
use std::sync::Arc;

/// Token and user as read back from storage, unvalidated.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

/// Sole writer of the `token` and `user` storage entries.
///
/// Both entries are written and removed together.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn save(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;
        self.storage.set_many(&[
            (keys::TOKEN, token.to_string()),
            (keys::USER, user_json),
        ])
    }

    /// Replace the user record, leaving the token untouched.
    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.storage.set(keys::USER, serde_json::to_string(user)?)
    }

    /// Read the stored pair.
    ///
    /// Returns `None` unless both entries are present and the user record
    /// parses.
    pub fn read(&self) -> Result<Option<StoredSession>, StorageError> {
        let token = self.storage.get(keys::TOKEN)?;
        let user = self.storage.get(keys::USER)?;

        let (Some(token), Some(user_json)) = (token, user) else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Ok(Some(StoredSession { token, user })),
            Err(err) => {
                tracing::warn!(error = %err, "Stored user record is unreadable");
                Ok(None)
            }
        }
    }

    /// Raw token entry, for attaching to outgoing requests.
    pub fn token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(keys::TOKEN)
    }

    /// True when either entry is present, even if the pair is unusable.
    pub fn has_any(&self) -> Result<bool, StorageError> {
        Ok(self.storage.get(keys::TOKEN)?.is_some() || self.storage.get(keys::USER)?.is_some())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_many(&[keys::TOKEN, keys::USER])
    }
}
