// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Reducers that turn raw metrics feeds into aggregate records.
//!
//! Each reducer is pure apart from [`collect_languages`], which drives the
//! cursor pagination of the metrics client strictly sequentially and only
//! returns once every page has been merged.

mod calendar;
mod counter;
mod languages;
mod rank;

pub use calendar::{CalendarSummary, active_days, summarize_calendar};
pub use counter::increment;
pub use languages::{LanguageAccumulator, REPOSITORY_CAP, collect_languages};
pub use rank::{Rank, RankPolicy, STAR_REPOSITORY_CAP, aggregate_stats};
