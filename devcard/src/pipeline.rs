// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Fetch, aggregate, persist and render.
//!
//! Each badge is produced independently: a failure is recorded in the
//! [`RunReport`] and the remaining badges still run. Within one badge the
//! record is only persisted and the artifact only written once aggregation
//! succeeded, so partial data never reaches the store or the output
//! directory.

use std::{
    fmt,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration
};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::{
    aggregate::{RankPolicy, aggregate_stats, collect_languages, increment, summarize_calendar},
    client::MetricsClient,
    config::DevcardConfig,
    error::{self, Error},
    model::{ContributionData, VisitorData},
    store::Storage,
    svg::{
        BadgeOptions, LanguagesCardOptions, StatsCardOptions, render_badge, render_languages_card,
        render_stats_card
    },
    theme::Theme
};

/// Store key of the contribution record.
pub const CONTRIBUTION_KEY: &str = "contribution-data";
/// Store key of the stats record.
pub const STATS_KEY: &str = "stats-data";
/// Store key of the languages record.
pub const LANGUAGES_KEY: &str = "languages-data";
/// Store key of the visitor counter.
pub const VISITOR_KEY: &str = "visitor-data";

/// Selection of badges for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Service {
    /// Active-days badge.
    Contribution,
    /// Ranked statistics card.
    Stats,
    /// Top languages card.
    Languages,
    /// Visit counter badge.
    Visitor,
    /// Every badge above, in that order.
    All
}

impl Service {
    /// Badges produced for this selection, in execution order.
    pub fn badges(self) -> &'static [Badge] {
        match self {
            Self::Contribution => &[Badge::Contribution],
            Self::Stats => &[Badge::Stats],
            Self::Languages => &[Badge::Languages],
            Self::Visitor => &[Badge::Visitor],
            Self::All => &[
                Badge::Contribution,
                Badge::Stats,
                Badge::Languages,
                Badge::Visitor
            ]
        }
    }
}

/// A single output artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    /// `contribution-badge.svg`.
    Contribution,
    /// `stats-card.svg`.
    Stats,
    /// `languages-card.svg`.
    Languages,
    /// `visitor-badge.svg`.
    Visitor
}

impl Badge {
    /// File name of the rendered SVG.
    pub fn artifact_name(self) -> &'static str {
        match self {
            Self::Contribution => "contribution-badge.svg",
            Self::Stats => "stats-card.svg",
            Self::Languages => "languages-card.svg",
            Self::Visitor => "visitor-badge.svg"
        }
    }

    /// Key of the persisted record.
    pub fn store_key(self) -> &'static str {
        match self {
            Self::Contribution => CONTRIBUTION_KEY,
            Self::Stats => STATS_KEY,
            Self::Languages => LANGUAGES_KEY,
            Self::Visitor => VISITOR_KEY
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Contribution => "contribution badge",
            Self::Stats => "stats card",
            Self::Languages => "languages card",
            Self::Visitor => "visitor badge"
        };
        f.write_str(name)
    }
}

/// Everything the renderers need, resolved before any work starts.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Login whose metrics are fetched.
    pub username:           String,
    /// Palette with overrides already applied.
    pub theme:              Theme,
    /// Options of the active-days badge.
    pub contribution_badge: BadgeOptions,
    /// Options of the visit counter badge.
    pub visitor_badge:      BadgeOptions,
    /// Options of the stats card.
    pub stats_card:         StatsCardOptions,
    /// Options of the languages card.
    pub languages_card:     LanguagesCardOptions,
    /// Repositories visited at most while merging languages.
    pub repository_cap:     usize,
    /// Rank formula of the stats card.
    pub rank_policy:        RankPolicy
}

impl RenderSettings {
    /// Combines the subject, the configuration file and the command line
    /// theme.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the subject is blank or a color
    /// override is invalid.
    pub fn new(
        username: &str,
        config: &DevcardConfig,
        cli_theme: Option<&str>
    ) -> Result<Self, Error> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::configuration("GitHub username is required"));
        }

        Ok(Self {
            username:           username.to_owned(),
            theme:              config.theme(cli_theme)?,
            contribution_badge: config.contribution_badge(),
            visitor_badge:      config.visitor_badge(),
            stats_card:         config.stats_card(username),
            languages_card:     config.languages_card(username),
            repository_cap:     config.repository_cap(),
            rank_policy:        RankPolicy::default()
        })
    }
}

/// Result of one badge.
#[derive(Debug)]
pub struct BadgeOutcome {
    /// Badge this outcome belongs to.
    pub badge:  Badge,
    /// Path of the written artifact, or the error that stopped the badge.
    pub result: Result<PathBuf, Error>
}

/// Outcomes of every badge requested in a run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per requested badge, in execution order.
    pub outcomes: Vec<BadgeOutcome>
}

impl RunReport {
    /// Outcomes that ended in an error.
    pub fn failures(&self) -> impl Iterator<Item = &BadgeOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err())
    }

    /// Returns `true` when every badge succeeded.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Drives the badges of a run against one client and one store.
pub struct Pipeline<'a, C: ?Sized, S> {
    client:     &'a C,
    storage:    &'a S,
    settings:   &'a RenderSettings,
    output_dir: &'a Path
}

impl<'a, C, S> Pipeline<'a, C, S>
where
    C: MetricsClient + ?Sized,
    S: Storage
{
    /// Binds the collaborators of a run.
    ///
    /// Artifacts are written to `output_dir`; records go through `storage`.
    pub fn new(
        client: &'a C,
        storage: &'a S,
        settings: &'a RenderSettings,
        output_dir: &'a Path
    ) -> Self {
        Self {
            client,
            storage,
            settings,
            output_dir
        }
    }

    /// Produces every badge of `service`, continuing past failures.
    pub async fn run(&self, service: Service, now: DateTime<Utc>) -> RunReport {
        let progress = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.cyan} [{elapsed_precise}] {msg}")
        {
            progress.set_style(style);
        }
        progress.enable_steady_tick(Duration::from_millis(120));

        let mut report = RunReport::default();
        for &badge in service.badges() {
            progress.set_message(format!("Rendering {badge}..."));
            let result = self.generate(badge, now).await;
            match &result {
                Ok(path) => info!(%badge, path = %path.display(), "artifact written"),
                Err(failure) => warn!(%badge, error = %failure, "badge failed")
            }
            report.outcomes.push(BadgeOutcome {
                badge,
                result
            });
        }

        let failed = report.failures().count();
        progress.finish_with_message(format!(
            "Rendered {} of {} artifacts",
            report.outcomes.len() - failed,
            report.outcomes.len()
        ));
        report
    }

    /// Produces a single badge and returns the artifact path.
    ///
    /// # Errors
    ///
    /// Returns the first transport, feed, storage or artifact error met
    /// while producing the badge.
    pub async fn generate(&self, badge: Badge, now: DateTime<Utc>) -> Result<PathBuf, Error> {
        let svg = match badge {
            Badge::Contribution => self.contribution(now).await?,
            Badge::Stats => self.stats().await?,
            Badge::Languages => self.languages().await?,
            Badge::Visitor => self.visitor(now)?
        };

        let path = self.output_dir.join(badge.artifact_name());
        write_artifact(&path, &svg)?;
        Ok(path)
    }

    async fn contribution(&self, now: DateTime<Utc>) -> Result<String, Error> {
        let calendar = self
            .client
            .contribution_calendar(&self.settings.username)
            .await?;
        let summary = summarize_calendar(&calendar);
        info!(
            active_days = summary.active_days,
            current_streak = summary.current_streak,
            longest_streak = summary.longest_streak,
            "summarized contribution calendar"
        );

        let record = ContributionData {
            total_days:     summary.active_days,
            last_updated:   now,
            current_streak: Some(summary.current_streak)
        };
        self.storage.write(CONTRIBUTION_KEY, &record)?;

        Ok(render_badge(
            record.total_days,
            &self.settings.contribution_badge,
            &self.settings.theme
        ))
    }

    async fn stats(&self) -> Result<String, Error> {
        let feed = self.client.stats(&self.settings.username).await?;
        let stats = aggregate_stats(&feed, &self.settings.rank_policy);
        info!(rank = %stats.rank, commits = stats.total_commits, "aggregated stats");

        self.storage.write(STATS_KEY, &stats)?;
        Ok(render_stats_card(
            &stats,
            &self.settings.stats_card,
            &self.settings.theme
        ))
    }

    async fn languages(&self) -> Result<String, Error> {
        let languages = collect_languages(
            self.client,
            &self.settings.username,
            self.settings.repository_cap
        )
        .await?;
        info!(
            languages = languages.languages.len(),
            total_size = languages.total_size,
            "aggregated languages"
        );

        self.storage.write(LANGUAGES_KEY, &languages)?;
        Ok(render_languages_card(
            &languages,
            &self.settings.languages_card,
            &self.settings.theme
        ))
    }

    fn visitor(&self, now: DateTime<Utc>) -> Result<String, Error> {
        let previous: Option<VisitorData> = self.storage.read(VISITOR_KEY)?;
        let next = increment(previous.as_ref(), now);
        self.storage.write(VISITOR_KEY, &next)?;
        info!(count = next.count, "incremented visitor counter");

        Ok(render_badge(
            next.count,
            &self.settings.visitor_badge,
            &self.settings.theme
        ))
    }
}

fn write_artifact(path: &Path, contents: &str) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| error::artifact_io_error(parent, source))?;
    }

    let file = File::create(path).map_err(|source| error::artifact_io_error(path, source))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .map_err(|source| error::artifact_io_error(path, source))?;
    writer
        .flush()
        .map_err(|source| error::artifact_io_error(path, source))
}
