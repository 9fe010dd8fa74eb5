// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models exchanged with the MindMate API and persisted locally.

pub mod auth;
pub mod payload;
pub mod user;
pub mod wellness;

pub use auth::{AuthResponse, LoginRequest, SignupRequest};
pub use payload::ListPayload;
pub use user::{User, UserPreferences};
pub use wellness::{
    BreathingSessionRequest, ChatMessageRequest, ChatReply, CheckinRequest, Conversation,
    FoodLogRequest, JournalEntryRequest,
};
