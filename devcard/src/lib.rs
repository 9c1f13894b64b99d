// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Self-hosted GitHub profile badges and cards.
//!
//! The library fetches raw activity from a metrics provider, reduces it to
//! small records (active days, ranked totals, a language breakdown, a visit
//! counter), persists those records and renders them as themed SVG. The
//! aggregation and rendering layers are pure; network access sits behind
//! [`MetricsClient`] and persistence behind [`Storage`], so both can be
//! replaced in tests.

mod aggregate;
mod client;
mod config;
mod error;
mod model;
mod pipeline;
pub mod retry;
mod store;
mod svg;
mod theme;

pub use aggregate::{
    CalendarSummary, LanguageAccumulator, REPOSITORY_CAP, Rank, RankPolicy, STAR_REPOSITORY_CAP,
    active_days, aggregate_stats, collect_languages, increment, summarize_calendar
};
#[cfg(any(test, feature = "mocks"))]
pub use client::MockMetricsClient;
pub use client::{
    CalendarWeek, ContributionCalendar, ContributionDay, GitHubClient, LanguageEdge, MetricsClient,
    PageInfo, RepositoryLanguages, RepositoryPage, StatsFeed
};
pub use config::{
    BadgeSection, DevcardConfig, FALLBACK_THEME, LanguagesSection, StatsSection, load_config,
    parse_config
};
pub use error::{Error, artifact_io_error, io_error, storage_error};
pub use model::{ContributionData, GitHubStats, Language, LanguagesData, VisitorData};
pub use pipeline::{
    Badge, BadgeOutcome, CONTRIBUTION_KEY, LANGUAGES_KEY, Pipeline, RenderSettings, RunReport,
    STATS_KEY, Service, VISITOR_KEY
};
pub use store::{FileStorage, Storage};
pub use svg::{
    BadgeLayout, BadgeOptions, DEFAULT_BADGE_HEIGHT, DEFAULT_CARD_WIDTH, DEFAULT_LANGUAGE_COUNT,
    LanguagesCardOptions, LanguagesLayout, STATS_ROW_HEIGHT, StatField, StatsCardOptions,
    card_height, escape_xml, format_number, has_icon, icon_names, render_badge, render_icon,
    render_languages_card, render_stats_card
};
pub use theme::{ColorOverrides, DEFAULT_THEME, Theme};
