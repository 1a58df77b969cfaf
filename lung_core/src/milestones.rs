//! Smoke-free milestone badge catalog.
//!
//! The catalog is fixed and ascending by day threshold. Earned badges
//! are merged with union semantics: once unlocked, a badge survives
//! even if the quit date is later edited backward.

use std::collections::BTreeSet;

/// One milestone badge definition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MilestoneBadge {
    pub id: &'static str,
    pub day: i64,
    pub title: &'static str,
    pub detail: &'static str,
    pub source_key: &'static str,
}

/// The badge catalog, ascending by day. Never mutated.
pub const MILESTONE_BADGES: [MilestoneBadge; 8] = [
    MilestoneBadge {
        id: "day-1",
        day: 1,
        title: "24 Hours Smoke-Free",
        detail: "Carbon monoxide levels can move toward a healthier range after one day.",
        source_key: "CDC-01",
    },
    MilestoneBadge {
        id: "day-3",
        day: 3,
        title: "72 Hours",
        detail: "Nicotine withdrawal is often strongest in the first three days.",
        source_key: "NHS-01",
    },
    MilestoneBadge {
        id: "day-14",
        day: 14,
        title: "Two Weeks",
        detail: "Breathing comfort and circulation can begin to noticeably improve.",
        source_key: "CDC-02",
    },
    MilestoneBadge {
        id: "day-30",
        day: 30,
        title: "One Month",
        detail: "Cough and mucus symptoms often reduce as airway clearance improves.",
        source_key: "PAPER-01",
    },
    MilestoneBadge {
        id: "day-90",
        day: 90,
        title: "Three Months",
        detail: "Lung function trend can improve in the first few smoke-free months.",
        source_key: "NHS-02",
    },
    MilestoneBadge {
        id: "day-180",
        day: 180,
        title: "Six Months",
        detail: "Respiratory irritation may continue easing with sustained abstinence.",
        source_key: "PAPER-02",
    },
    MilestoneBadge {
        id: "day-365",
        day: 365,
        title: "One Year",
        detail: "Major cardiovascular risk reduction is expected after one year.",
        source_key: "CDC-03",
    },
    MilestoneBadge {
        id: "day-730",
        day: 730,
        title: "Two Years",
        detail: "Longer smoke-free periods support ongoing respiratory recovery.",
        source_key: "WHO-01",
    },
];

/// Ids of every badge whose day threshold is within the smoke-free
/// streak, in catalog order.
pub fn earned_badge_ids(days_smoke_free: i64) -> Vec<String> {
    MILESTONE_BADGES
        .iter()
        .filter(|badge| days_smoke_free >= badge.day)
        .map(|badge| badge.id.to_string())
        .collect()
}

/// Union of already-persisted and newly unlocked badge ids,
/// de-duplicated and order-insensitive. Badges are never revoked.
pub fn merge_earned_badge_ids(existing: &[String], unlocked: &[String]) -> Vec<String> {
    let merged: BTreeSet<&str> = existing
        .iter()
        .chain(unlocked.iter())
        .map(String::as_str)
        .collect();
    merged.into_iter().map(str::to_string).collect()
}
