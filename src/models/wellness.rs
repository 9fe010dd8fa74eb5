// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request and response bodies for check-ins, food logs, journaling,
//! chat and breathing sessions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    VeryLow,
    Low,
    Neutral,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckinType {
    Morning,
    Evening,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckinRequest {
    pub checkin_type: CheckinType,
    pub mood: Mood,
    /// 1-5
    pub energy_level: u8,
    /// 1-10
    pub stress_level: u8,
    /// 1-10
    pub hunger_level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gratitude: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodLogRequest {
    pub meal_type: MealType,
    pub food_items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portion_size: Option<String>,
    pub hunger_before: u8,
    pub hunger_after: u8,
    pub emotions_before: Vec<String>,
    pub emotions_after: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mindful_eating_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JournalEntryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    pub tags: Vec<String>,
    pub is_private: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageRequest {
    pub message: String,
    pub context: Option<Value>,
}

/// AI reply to a chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One exchange in the chat history.
#[derive(Debug, Clone, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default)]
    pub ai_response: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Conversation {
    /// True when either side of the exchange has visible text.
    pub fn has_content(&self) -> bool {
        let non_blank = |s: &Option<String>| s.as_deref().is_some_and(|t| !t.trim().is_empty());
        non_blank(&self.user_message) || non_blank(&self.ai_response)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BreathingSessionRequest {
    pub technique: String,
    pub duration_seconds: u32,
    pub completed: bool,
    /// RFC3339, stamped by the client when the session is saved
    pub session_date: String,
}
