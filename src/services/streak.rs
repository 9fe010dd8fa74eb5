// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Check-in streak computation.
//!
//! Everything here is pure: dates in, numbers and labels out. Entries that
//! do not parse as a calendar day are skipped; they never extend or break
//! a streak.

use crate::time_utils::{local_today, parse_calendar_day};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Streak lengths that always earn a celebration (when not yet shown).
pub const NOTIFY_MILESTONES: [u32; 6] = [3, 14, 30, 50, 100, 365];

/// Targets shown as "next milestone" in the profile view.
pub const PROGRESS_MILESTONES: [u32; 8] = [1, 3, 7, 14, 30, 50, 100, 365];

/// Milestone tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneLevel {
    Beginner,
    Starter,
    Builder,
    Achiever,
    Warrior,
    Champion,
    Master,
    Legend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Milestone {
    pub level: MilestoneLevel,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub emoji: &'static str,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub title: &'static str,
}

/// Tier thresholds, checked from the top down.
const LADDER: [(u32, Milestone); 7] = [
    (365, Milestone { level: MilestoneLevel::Legend, emoji: "🏆", title: "Wellness Legend" }),
    (100, Milestone { level: MilestoneLevel::Master, emoji: "👑", title: "Wellness Master" }),
    (50, Milestone { level: MilestoneLevel::Champion, emoji: "🌟", title: "Wellness Champion" }),
    (30, Milestone { level: MilestoneLevel::Warrior, emoji: "⚡", title: "Wellness Warrior" }),
    (14, Milestone { level: MilestoneLevel::Achiever, emoji: "🎯", title: "Wellness Achiever" }),
    (7, Milestone { level: MilestoneLevel::Builder, emoji: "🔥", title: "Streak Builder" }),
    (3, Milestone { level: MilestoneLevel::Starter, emoji: "🌱", title: "Wellness Starter" }),
];

const BEGINNER: Milestone = Milestone {
    level: MilestoneLevel::Beginner,
    emoji: "✨",
    title: "New Journey",
};

/// Everything the profile view needs about the current streak.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
    pub milestone: Milestone,
    pub next_milestone: u32,
    /// `current / next_milestone * 100`, 0 with no streak
    pub progress_percent: f64,
}

fn check_in_days<I>(dates: I) -> HashSet<NaiveDate>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    dates
        .into_iter()
        .filter_map(|d| parse_calendar_day(d.as_ref()))
        .collect()
}

/// Consecutive days with a check-in, ending today (local time).
pub fn calculate_streak<I>(dates: I) -> u32
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    calculate_streak_at(local_today(), dates)
}

/// Consecutive days with a check-in, walking back from `today`.
pub fn calculate_streak_at<I>(today: NaiveDate, dates: I) -> u32
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    streak_from_days(today, &check_in_days(dates))
}

fn streak_from_days(today: NaiveDate, days: &HashSet<NaiveDate>) -> u32 {
    let mut streak = 0;
    let mut day = Some(today);
    while let Some(d) = day.filter(|d| days.contains(d)) {
        streak += 1;
        day = d.pred_opt();
    }
    streak
}

/// Longest run of consecutive check-in days anywhere in the history.
pub fn longest_streak<I>(dates: I) -> u32
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let days: BTreeSet<NaiveDate> = check_in_days(dates).into_iter().collect();

    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for day in days {
        run = match prev {
            Some(p) if p.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }
    longest
}

pub fn classify_milestone(streak: u32) -> Milestone {
    LADDER
        .iter()
        .find(|(threshold, _)| streak >= *threshold)
        .map(|(_, milestone)| *milestone)
        .unwrap_or(BEGINNER)
}

/// Decide whether to show a celebration for `current_streak`.
///
/// The caller must persist `current_streak` as the new last-shown value
/// right after acting on a `true`, or the same milestone is announced again.
pub fn should_notify(current_streak: u32, last_shown_streak: u32) -> bool {
    if current_streak == 1 {
        return true;
    }
    let unseen = current_streak > last_shown_streak;
    if current_streak % 7 == 0 && current_streak > 0 && unseen {
        return true;
    }
    NOTIFY_MILESTONES.contains(&current_streak) && unseen
}

/// The next progress target above `streak`.
pub fn next_milestone(streak: u32) -> u32 {
    PROGRESS_MILESTONES
        .iter()
        .copied()
        .find(|m| *m > streak)
        .unwrap_or(streak.saturating_add(50))
}

/// Encouragement text shown with a celebration.
pub fn streak_message(streak: u32) -> String {
    let fixed = match streak {
        1 => Some("Amazing start! Every journey begins with a single step. 🌟"),
        3 => Some("Three days strong! You're building a powerful habit. 🔥"),
        7 => Some("One week milestone! Your dedication is inspiring. 🎉"),
        14 => Some("Two weeks of consistency! You're on fire! ⚡"),
        30 => Some("30 days of wellness! You're a true champion! 🏆"),
        50 => Some("50 days! Your commitment is extraordinary! 👑"),
        100 => Some("100 days! You've achieved wellness mastery! 🌟✨"),
        365 => Some("One full year! You are a wellness legend! 🏆👑🌟"),
        _ => None,
    };
    if let Some(message) = fixed {
        return message.to_string();
    }

    if streak % 50 == 0 {
        format!("{} days of pure dedication! Keep shining! ✨", streak)
    } else if streak % 25 == 0 {
        format!("{} days and counting! You're unstoppable! 🚀", streak)
    } else if streak % 10 == 0 {
        format!("{} days strong! Your consistency amazes us! 💪", streak)
    } else {
        format!("{} days of wellness! Keep up the amazing work! 🌈", streak)
    }
}

/// Build the profile summary for `dates` as of `today`.
pub fn summarize_at<I>(today: NaiveDate, dates: I) -> StreakSummary
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let dates: Vec<I::Item> = dates.into_iter().collect();
    let current = calculate_streak_at(today, dates.iter().map(|d| d.as_ref()));
    let longest = longest_streak(dates.iter().map(|d| d.as_ref())).max(current);
    let next = next_milestone(current);
    let progress_percent = if current > 0 {
        f64::from(current) / f64::from(next) * 100.0
    } else {
        0.0
    };

    StreakSummary {
        current,
        longest,
        milestone: classify_milestone(current),
        next_milestone: next,
        progress_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn days_ago(n: i64) -> String {
        (today() - Duration::days(n)).to_string()
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(calculate_streak_at(today(), Vec::<String>::new()), 0);
        assert_eq!(longest_streak(Vec::<String>::new()), 0);
    }

    #[test]
    fn test_consecutive_days() {
        assert_eq!(calculate_streak_at(today(), [days_ago(0)]), 1);
        assert_eq!(
            calculate_streak_at(today(), [days_ago(0), days_ago(1), days_ago(2)]),
            3
        );
    }

    #[test]
    fn test_gap_breaks_streak() {
        assert_eq!(calculate_streak_at(today(), [days_ago(0), days_ago(2)]), 1);
        // No check-in today means no current streak.
        assert_eq!(calculate_streak_at(today(), [days_ago(1), days_ago(2)]), 0);
    }

    #[test]
    fn test_order_duplicates_and_time_of_day() {
        let dates = [
            format!("{}T21:15:00", days_ago(1)),
            format!("{}T06:00:00", days_ago(0)),
            format!("{}T23:59:59", days_ago(0)),
            days_ago(2),
        ];
        assert_eq!(calculate_streak_at(today(), dates), 3);
    }

    #[test]
    fn test_unparseable_dates_are_skipped() {
        let dates = [
            days_ago(0),
            "not a date".to_string(),
            days_ago(1),
            String::new(),
        ];
        assert_eq!(calculate_streak_at(today(), dates), 2);
        assert_eq!(calculate_streak_at(today(), ["garbage"]), 0);
    }

    #[test]
    fn test_future_dates_do_not_count() {
        assert_eq!(calculate_streak_at(today(), [days_ago(-1)]), 0);
    }

    #[test]
    fn test_longest_streak() {
        let dates = [
            days_ago(20),
            days_ago(19),
            days_ago(18),
            days_ago(17),
            days_ago(5),
            days_ago(0),
        ];
        assert_eq!(longest_streak(dates), 4);
    }

    #[test]
    fn test_milestone_ladder() {
        let cases = [
            (0, MilestoneLevel::Beginner),
            (2, MilestoneLevel::Beginner),
            (3, MilestoneLevel::Starter),
            (6, MilestoneLevel::Starter),
            (7, MilestoneLevel::Builder),
            (14, MilestoneLevel::Achiever),
            (29, MilestoneLevel::Achiever),
            (30, MilestoneLevel::Warrior),
            (50, MilestoneLevel::Champion),
            (100, MilestoneLevel::Master),
            (364, MilestoneLevel::Master),
            (365, MilestoneLevel::Legend),
            (10_000, MilestoneLevel::Legend),
        ];
        for (streak, level) in cases {
            assert_eq!(classify_milestone(streak).level, level, "streak {}", streak);
        }
        assert_eq!(classify_milestone(7).title, "Streak Builder");
        assert_eq!(classify_milestone(0).emoji, "✨");
    }

    #[test]
    fn test_milestone_ladder_is_monotonic() {
        let mut previous = classify_milestone(0).level;
        for streak in 1..=800 {
            let level = classify_milestone(streak).level;
            assert!(level >= previous, "tier dropped at {}", streak);
            previous = level;
        }
    }

    #[test]
    fn test_should_notify() {
        assert!(should_notify(1, 0));
        assert!(should_notify(1, 1));
        assert!(should_notify(7, 0));
        assert!(!should_notify(7, 7));
        assert!(!should_notify(8, 7));
        assert!(should_notify(14, 10));
        assert!(!should_notify(4, 0));
        assert!(should_notify(3, 0));
        assert!(should_notify(50, 49));
        assert!(!should_notify(50, 50));
        assert!(!should_notify(0, 0));
        assert!(!should_notify(2, 0));
    }

    #[test]
    fn test_next_milestone() {
        assert_eq!(next_milestone(0), 1);
        assert_eq!(next_milestone(1), 3);
        assert_eq!(next_milestone(7), 14);
        assert_eq!(next_milestone(364), 365);
        assert_eq!(next_milestone(365), 415);
    }

    #[test]
    fn test_streak_message() {
        assert!(streak_message(7).starts_with("One week milestone!"));
        assert!(streak_message(150).contains("pure dedication"));
        assert!(streak_message(75).contains("unstoppable"));
        assert!(streak_message(20).contains("consistency amazes"));
        assert_eq!(
            streak_message(4),
            "4 days of wellness! Keep up the amazing work! 🌈"
        );
    }

    #[test]
    fn test_summarize() {
        let summary = summarize_at(today(), [days_ago(0), days_ago(1), days_ago(2)]);
        assert_eq!(summary.current, 3);
        assert_eq!(summary.longest, 3);
        assert_eq!(summary.milestone.level, MilestoneLevel::Starter);
        assert_eq!(summary.next_milestone, 7);
        assert!((summary.progress_percent - 300.0 / 7.0).abs() < 1e-9);

        let empty = summarize_at(today(), Vec::<String>::new());
        assert_eq!(empty.progress_percent, 0.0);
        assert_eq!(empty.next_milestone, 1);
    }
}
