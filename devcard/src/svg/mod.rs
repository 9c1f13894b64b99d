// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! SVG layout engine.
//!
//! Every renderer is a pure function of a record, its presentation options
//! and a [`Theme`](crate::Theme). Interpolated text is XML-escaped and
//! widths are estimated from character counts.

mod badge;
mod card;
mod icons;
mod languages_card;
mod markup;
mod stats_card;

pub use badge::{BadgeLayout, BadgeOptions, DEFAULT_BADGE_HEIGHT, render_badge};
pub use card::{DEFAULT_CARD_WIDTH, card_height};
pub use icons::{has_icon, icon_names, render_icon};
pub use languages_card::{
    DEFAULT_LANGUAGE_COUNT, LanguagesCardOptions, LanguagesLayout, render_languages_card
};
pub use markup::{escape_xml, format_number};
pub use stats_card::{STATS_ROW_HEIGHT, StatField, StatsCardOptions, render_stats_card};

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        aggregate::Rank,
        model::{GitHubStats, Language, LanguagesData},
        theme::Theme
    };

    fn text() -> impl Strategy<Value = String> {
        prop::collection::vec(any::<char>(), 0..24).prop_map(String::from_iter)
    }

    fn theme_name() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("default"), Just("light")]
    }

    fn assert_well_formed(svg: &str) {
        if let Err(error) = roxmltree::Document::parse(svg) {
            panic!("invalid svg: {error}\n{svg}");
        }
    }

    proptest! {
        #[test]
        fn every_renderer_emits_well_formed_xml(
            label in text(),
            username in text(),
            names in prop::collection::vec(text(), 0..6),
            theme in theme_name(),
            value in any::<u64>()
        ) {
            let theme = Theme::resolve(theme);

            let badge = BadgeOptions {
                label: label.clone(),
                ..BadgeOptions::visitor()
            };
            assert_well_formed(&render_badge(value, &badge, &theme));

            let stats = GitHubStats {
                total_commits:  value,
                total_prs:      value / 2,
                total_issues:   value / 3,
                total_stars:    value / 4,
                contributed_to: value / 5,
                rank:           Rank::B
            };
            let stats_options = StatsCardOptions {
                username: username.clone(),
                ..StatsCardOptions::default()
            };
            assert_well_formed(&render_stats_card(&stats, &stats_options, &theme));

            let languages = LanguagesData {
                languages:  names
                    .iter()
                    .map(|name| Language {
                        name:       name.clone(),
                        percentage: 100.0 / names.len() as f64,
                        color:      label.clone(),
                        size:       1
                    })
                    .collect(),
                total_size: names.len() as u64
            };
            let languages_options = LanguagesCardOptions {
                username,
                count: 6,
                ..LanguagesCardOptions::default()
            };
            assert_well_formed(&render_languages_card(&languages, &languages_options, &theme));
        }
    }
}
