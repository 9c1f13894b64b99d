// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::client::{ContributionCalendar, ContributionDay};

/// Activity figures derived from a contribution calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CalendarSummary {
    /// Days with a contribution count above zero.
    pub active_days:         u64,
    /// Trailing run of active days. A zero on the final day alone does not
    /// break the run because that day may still be in progress.
    pub current_streak:      u64,
    /// Longest run of consecutive active days.
    pub longest_streak:      u64,
    /// Total reported by the provider.
    pub total_contributions: u64
}

/// Counts the days whose contribution count is strictly greater than zero.
///
/// Week grouping does not matter; an empty calendar yields `0`.
///
/// # Examples
///
/// ```
/// use devcard::{ContributionCalendar, active_days};
///
/// assert_eq!(active_days(&ContributionCalendar::default()), 0);
/// ```
pub fn active_days(calendar: &ContributionCalendar) -> u64 {
    days(calendar)
        .filter(|day| day.contribution_count > 0)
        .count() as u64
}

/// Reduces the calendar to active days and streak lengths in one pass.
pub fn summarize_calendar(calendar: &ContributionCalendar) -> CalendarSummary {
    let mut summary = CalendarSummary {
        total_contributions: calendar.total_contributions,
        ..CalendarSummary::default()
    };
    let mut run = 0u64;

    for day in days(calendar) {
        if day.contribution_count > 0 {
            summary.active_days += 1;
            run += 1;
            summary.longest_streak = summary.longest_streak.max(run);
        } else {
            run = 0;
        }
    }

    summary.current_streak = current_streak(calendar);
    summary
}

fn current_streak(calendar: &ContributionCalendar) -> u64 {
    let mut reversed = days(calendar).rev().peekable();

    if reversed
        .peek()
        .is_some_and(|today| today.contribution_count == 0)
    {
        reversed.next();
    }

    reversed
        .take_while(|day| day.contribution_count > 0)
        .count() as u64
}

fn days(calendar: &ContributionCalendar) -> impl DoubleEndedIterator<Item = &ContributionDay> {
    calendar
        .weeks
        .iter()
        .flat_map(|week| week.contribution_days.iter())
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use proptest::prelude::*;

    use super::*;
    use crate::client::CalendarWeek;

    fn calendar(weeks: &[&[u64]]) -> ContributionCalendar {
        let start = NaiveDate::from_ymd_opt(2025, 1, 5).expect("valid date");
        let mut offset = 0u64;
        let weeks: Vec<CalendarWeek> = weeks
            .iter()
            .map(|counts| CalendarWeek {
                contribution_days: counts
                    .iter()
                    .map(|&contribution_count| {
                        let date = start + Days::new(offset);
                        offset += 1;
                        ContributionDay {
                            date,
                            contribution_count
                        }
                    })
                    .collect()
            })
            .collect();

        ContributionCalendar {
            total_contributions: weeks_total(&weeks),
            weeks
        }
    }

    fn weeks_total(weeks: &[CalendarWeek]) -> u64 {
        weeks
            .iter()
            .flat_map(|week| &week.contribution_days)
            .map(|day| day.contribution_count)
            .sum()
    }

    #[test]
    fn empty_calendar_has_no_active_days() {
        assert_eq!(active_days(&ContributionCalendar::default()), 0);
        assert_eq!(active_days(&calendar(&[&[], &[]])), 0);
        assert_eq!(
            summarize_calendar(&ContributionCalendar::default()),
            CalendarSummary::default()
        );
    }

    #[test]
    fn all_zero_calendar_has_no_active_days() {
        assert_eq!(active_days(&calendar(&[&[0, 0, 0], &[0, 0]])), 0);
    }

    #[test]
    fn counts_only_positive_days() {
        let calendar = calendar(&[&[0, 3, 0, 1], &[7, 0, 0]]);
        assert_eq!(active_days(&calendar), 3);
    }

    #[test]
    fn streaks_span_week_boundaries() {
        let summary = summarize_calendar(&calendar(&[&[1, 0, 2, 3], &[4, 5], &[0, 1, 1]]));

        assert_eq!(summary.active_days, 7);
        assert_eq!(summary.longest_streak, 4);
        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.total_contributions, 17);
    }

    #[test]
    fn inactive_final_day_does_not_break_current_streak() {
        let summary = summarize_calendar(&calendar(&[&[1, 1, 1, 0]]));
        assert_eq!(summary.current_streak, 3);
    }

    #[test]
    fn two_inactive_final_days_reset_current_streak() {
        let summary = summarize_calendar(&calendar(&[&[1, 1, 0, 0]]));
        assert_eq!(summary.current_streak, 0);
        assert_eq!(summary.longest_streak, 2);
    }

    proptest! {
        #[test]
        fn active_days_ignore_week_grouping(
            counts in prop::collection::vec(0u64..4, 0..120),
            week_len in 1usize..9
        ) {
            let regrouped: Vec<&[u64]> = counts.chunks(week_len).collect();
            let flat = calendar(&[counts.as_slice()]);
            let grouped = calendar(&regrouped);
            let expected = counts.iter().filter(|&&count| count > 0).count() as u64;

            prop_assert_eq!(active_days(&flat), expected);
            prop_assert_eq!(active_days(&grouped), expected);
            prop_assert_eq!(summarize_calendar(&grouped), summarize_calendar(&flat));
        }

        #[test]
        fn streaks_never_exceed_active_days(counts in prop::collection::vec(0u64..3, 0..120)) {
            let summary = summarize_calendar(&calendar(&[counts.as_slice()]));
            prop_assert!(summary.current_streak <= summary.longest_streak);
            prop_assert!(summary.longest_streak <= summary.active_days);
        }
    }
}
