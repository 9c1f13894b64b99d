// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};

use crate::model::VisitorData;

/// Advances the visit counter by exactly one.
///
/// An absent record starts the counter at `1`. The timestamp never moves
/// backwards: when `now` is older than the stored timestamp the stored one
/// is kept.
///
/// The read-increment-write cycle around this function is not atomic; two
/// concurrent runs against the same store can lose an increment.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use devcard::increment;
///
/// let first = increment(None, Utc::now());
/// assert_eq!(first.count, 1);
/// assert_eq!(increment(Some(&first), Utc::now()).count, 2);
/// ```
pub fn increment(previous: Option<&VisitorData>, now: DateTime<Utc>) -> VisitorData {
    match previous {
        None => VisitorData {
            count:        1,
            last_updated: now
        },
        Some(previous) => VisitorData {
            count:        previous.count.saturating_add(1),
            last_updated: now.max(previous.last_updated)
        }
    }
}
