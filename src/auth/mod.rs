// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side session handling: token decoding, persistence and lifecycle.

pub mod session;
pub mod store;
pub mod token;

pub use session::{EndReason, SessionEvent, SessionManager, SessionState};
pub use store::{StoredSession, TokenStore};
pub use token::{DecodeError, ExpiryPolicy, TokenClaims};
