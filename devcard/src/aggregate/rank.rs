// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{client::StatsFeed, model::GitHubStats};

/// Owned repositories considered when summing stars.
///
/// Stars are taken from a single page ordered by stargazers, so owners with
/// more repositories get an approximate (lower bound) total.
pub const STAR_REPOSITORY_CAP: u32 = 100;

/// Coarse letter grade derived from the weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    /// Below every threshold.
    C,
    /// Labelled `B`.
    B,
    /// Labelled `B+`.
    BPlus,
    /// Labelled `A`.
    A,
    /// Labelled `A+`.
    APlus,
    /// Top tier, labelled `S`.
    S
}

impl Rank {
    /// Label rendered on the card and stored in the record.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::C => "C"
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        [Self::S, Self::APlus, Self::A, Self::BPlus, Self::B, Self::C]
            .into_iter()
            .find(|rank| rank.as_str() == label)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Rank {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>
    {
        let label = String::deserialize(deserializer)?;
        Self::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown rank '{label}'")))
    }
}

/// Weights and thresholds of the rank formula.
///
/// `score = commits*commit_weight + prs*pr_weight + stars*star_weight +
/// issues*issue_weight`; thresholds are checked highest first and the first
/// satisfied one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankPolicy {
    /// Points per commit.
    pub commit_weight: u64,
    /// Points per pull request.
    pub pr_weight:     u64,
    /// Points per star.
    pub star_weight:   u64,
    /// Points per issue.
    pub issue_weight:  u64,
    /// Minimum scores in descending order; anything below is [`Rank::C`].
    pub thresholds:    [(u64, Rank); 5]
}

impl Default for RankPolicy {
    fn default() -> Self {
        Self {
            commit_weight: 1,
            pr_weight:     2,
            star_weight:   3,
            issue_weight:  1,
            thresholds:    [
                (1000, Rank::S),
                (500, Rank::APlus),
                (250, Rank::A),
                (100, Rank::BPlus),
                (50, Rank::B)
            ]
        }
    }
}

impl RankPolicy {
    /// Computes the weighted score.
    pub fn score(&self, commits: u64, prs: u64, issues: u64, stars: u64) -> u64 {
        commits
            .saturating_mul(self.commit_weight)
            .saturating_add(prs.saturating_mul(self.pr_weight))
            .saturating_add(stars.saturating_mul(self.star_weight))
            .saturating_add(issues.saturating_mul(self.issue_weight))
    }

    /// Maps a score onto a rank tier.
    ///
    /// # Examples
    ///
    /// ```
    /// use devcard::{Rank, RankPolicy};
    ///
    /// let policy = RankPolicy::default();
    /// assert_eq!(policy.rank(999), Rank::APlus);
    /// assert_eq!(policy.rank(1000), Rank::S);
    /// ```
    pub fn rank(&self, score: u64) -> Rank {
        self.thresholds
            .iter()
            .find(|(minimum, _)| score >= *minimum)
            .map_or(Rank::C, |(_, rank)| *rank)
    }
}

/// Builds the stats record from raw totals.
pub fn aggregate_stats(feed: &StatsFeed, policy: &RankPolicy) -> GitHubStats {
    let total_issues = feed.open_issues.saturating_add(feed.closed_issues);
    let total_stars = feed
        .repository_stars
        .iter()
        .take(STAR_REPOSITORY_CAP as usize)
        .fold(0u64, |sum, stars| sum.saturating_add(*stars));
    let score = policy.score(
        feed.total_commits,
        feed.total_pull_requests,
        total_issues,
        total_stars
    );

    GitHubStats {
        total_commits: feed.total_commits,
        total_prs: feed.total_pull_requests,
        total_issues,
        total_stars,
        contributed_to: feed.contributed_to,
        rank: policy.rank(score)
    }
}
