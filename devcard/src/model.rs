// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Aggregate records produced by the pipeline and persisted between runs.
//!
//! Field names serialize in camelCase so the stored JSON stays readable by
//! downstream consumers that expect the historical record layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::Rank;

/// Active-day summary rendered by the contribution badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionData {
    /// Days in the calendar with at least one contribution.
    pub total_days:     u64,
    /// Moment the record was produced.
    pub last_updated:   DateTime<Utc>,
    /// Length of the trailing run of active days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_streak: Option<u64>
}

/// Persisted visit counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorData {
    /// Number of recorded visits.
    pub count:        u64,
    /// Moment of the last increment.
    pub last_updated: DateTime<Utc>
}

/// Aggregate developer statistics rendered by the stats card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubStats {
    /// Commits attributed to the subject over the provider's window.
    pub total_commits:  u64,
    /// Pull requests opened by the subject.
    #[serde(rename = "totalPRs")]
    pub total_prs:      u64,
    /// Open and closed issues together.
    pub total_issues:   u64,
    /// Stars summed over the first page of owned repositories only.
    pub total_stars:    u64,
    /// Repositories the subject contributed to.
    pub contributed_to: u64,
    /// Tier derived from the weighted score.
    pub rank:           Rank
}

/// One entry of the language breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    /// Language name as reported by the provider.
    pub name:       String,
    /// Share of the total size, `0.0..=100.0`.
    pub percentage: f64,
    /// Provider color, empty when the provider has none.
    pub color:      String,
    /// Accumulated bytes across processed repositories.
    pub size:       u64
}

/// Language breakdown sorted by size descending.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesData {
    /// Every merged language, largest first.
    pub languages:  Vec<Language>,
    /// Sum of all language sizes.
    pub total_size: u64
}
