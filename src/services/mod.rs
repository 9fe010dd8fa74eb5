// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - API access and streak logic.

pub mod api;
pub mod celebration;
pub mod streak;

pub use api::ApiClient;
pub use celebration::{Celebration, StreakCelebrations};
pub use streak::{Milestone, MilestoneLevel, StreakSummary};
