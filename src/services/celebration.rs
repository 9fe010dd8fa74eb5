// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Streak celebrations shown after login.
//!
//! Owns the persisted "last shown streak" marker so that a milestone is
//! announced once, not on every login.

use crate::services::streak::{self, Milestone};
use crate::storage::{keys, Storage, StorageError};
use crate::time_utils::local_today;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A celebration the UI should display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Celebration {
    pub streak: u32,
    pub milestone: Milestone,
    pub message: String,
}

#[derive(Clone)]
pub struct StreakCelebrations {
    storage: Arc<dyn Storage>,
}

impl StreakCelebrations {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Last streak value a celebration was shown for (0 if none).
    pub fn last_shown(&self) -> Result<u32, StorageError> {
        Ok(self
            .storage
            .get(keys::LAST_SHOWN_STREAK)?
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0))
    }

    pub fn evaluate<I>(&self, dates: I) -> Result<Option<Celebration>, StorageError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.evaluate_at(local_today(), dates)
    }

    /// Compute the streak and, if it deserves a celebration, record it as
    /// shown and return it.
    pub fn evaluate_at<I>(
        &self,
        today: NaiveDate,
        dates: I,
    ) -> Result<Option<Celebration>, StorageError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let current = streak::calculate_streak_at(today, dates);
        let last_shown = self.last_shown()?;

        if !streak::should_notify(current, last_shown) {
            tracing::debug!(current, last_shown, "No streak celebration");
            return Ok(None);
        }

        self.storage
            .set(keys::LAST_SHOWN_STREAK, current.to_string())?;
        tracing::info!(streak = current, "Streak celebration");

        Ok(Some(Celebration {
            streak: current,
            milestone: streak::classify_milestone(current),
            message: streak::streak_message(current),
        }))
    }
}
