// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Profile statistics card with rank badge.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{
    card::{
        CARD_PADDING, CardFrame, DEFAULT_CARD_WIDTH, ROW_ICON_SIZE, card_height, close_card,
        open_card, row_top
    },
    icons::render_icon,
    markup::{FONT_FAMILY, escape_xml, format_number}
};
use crate::{model::GitHubStats, theme::Theme};

/// Height of one statistic row.
pub const STATS_ROW_HEIGHT: u32 = 30;

const RANK_SIZE: u32 = 60;
const RANK_RADIUS: u32 = 28;
const ICON_TEXT_GAP: u32 = 10;

/// A row of the stats card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatField {
    TotalCommits,
    #[serde(rename = "totalPRs")]
    TotalPrs,
    TotalIssues,
    TotalStars,
    ContributedTo
}

impl StatField {
    /// Every row in display order.
    pub const ALL: [Self; 5] = [
        Self::TotalCommits,
        Self::TotalPrs,
        Self::TotalIssues,
        Self::TotalStars,
        Self::ContributedTo
    ];

    /// Row caption.
    pub fn label(self) -> &'static str {
        match self {
            Self::TotalCommits => "Total Commits",
            Self::TotalPrs => "Pull Requests",
            Self::TotalIssues => "Total Issues",
            Self::TotalStars => "Total Stars",
            Self::ContributedTo => "Contributed To"
        }
    }

    /// Icon drawn before the caption.
    pub fn icon(self) -> &'static str {
        match self {
            Self::TotalCommits => "git-commit",
            Self::TotalPrs => "git-pull-request",
            Self::TotalIssues => "circle-dot",
            Self::TotalStars => "star",
            Self::ContributedTo => "git-branch"
        }
    }

    /// Reads the matching figure from a stats record.
    pub fn value(self, stats: &GitHubStats) -> u64 {
        match self {
            Self::TotalCommits => stats.total_commits,
            Self::TotalPrs => stats.total_prs,
            Self::TotalIssues => stats.total_issues,
            Self::TotalStars => stats.total_stars,
            Self::ContributedTo => stats.contributed_to
        }
    }
}

/// Presentation knobs of the stats card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsCardOptions {
    /// Name shown in the title.
    pub username:   String,
    /// Rows left out of the card.
    pub hide:       Vec<StatField>,
    /// Draw an icon before each caption.
    pub show_icons: bool,
    /// Card width in pixels.
    pub width:      u32
}

impl Default for StatsCardOptions {
    fn default() -> Self {
        Self {
            username:   String::new(),
            hide:       Vec::new(),
            show_icons: true,
            width:      DEFAULT_CARD_WIDTH
        }
    }
}

impl StatsCardOptions {
    /// Rows that remain after hiding, in display order.
    pub fn visible_fields(&self) -> Vec<StatField> {
        StatField::ALL
            .into_iter()
            .filter(|field| !self.hide.contains(field))
            .collect()
    }
}

/// Renders the stats card.
pub fn render_stats_card(stats: &GitHubStats, options: &StatsCardOptions, theme: &Theme) -> String {
    let fields = options.visible_fields();
    let width = options.width;
    let height = card_height(fields.len(), STATS_ROW_HEIGHT);
    let title = format!("{}'s GitHub Stats", options.username);
    let text_color = escape_xml(&theme.text);
    let accent = escape_xml(&theme.accent);
    let value_x = width.saturating_sub(CARD_PADDING + RANK_SIZE + ICON_TEXT_GAP);

    let mut buffer = String::with_capacity(4096);
    open_card(
        &mut buffer,
        &CardFrame {
            width,
            height,
            title: &title,
            gradient_id: "statsGradient",
            divider_inset: RANK_SIZE + ICON_TEXT_GAP
        },
        theme
    );

    let rank_cx = width.saturating_sub(CARD_PADDING + RANK_SIZE / 2);
    let rank_cy = CARD_PADDING + RANK_SIZE / 2;
    let _ = writeln!(
        buffer,
        "  <circle cx=\"{rank_cx}\" cy=\"{rank_cy}\" r=\"{RANK_RADIUS}\" fill=\"{accent}\" fill-opacity=\"0.2\" stroke=\"{accent}\" stroke-width=\"2\"/>"
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"{rank_cx}\" y=\"{rank_cy}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{FONT_FAMILY}\" font-size=\"22\" font-weight=\"700\" fill=\"{accent}\">{}</text>",
        stats.rank
    );

    for (index, field) in fields.iter().enumerate() {
        let top = row_top(index, STATS_ROW_HEIGHT);
        let baseline = top + STATS_ROW_HEIGHT / 2;
        let mut label_x = CARD_PADDING;

        if options.show_icons {
            let icon_y = f64::from(baseline) - f64::from(ROW_ICON_SIZE) / 2.0;
            if let Some(icon) = render_icon(
                field.icon(),
                f64::from(CARD_PADDING),
                icon_y,
                ROW_ICON_SIZE,
                &theme.accent
            ) {
                let _ = writeln!(buffer, "  {icon}");
            }
            label_x += ROW_ICON_SIZE + ICON_TEXT_GAP;
        }

        let _ = writeln!(
            buffer,
            "  <text x=\"{label_x}\" y=\"{baseline}\" dominant-baseline=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"14\" fill=\"{text_color}\">{}</text>",
            field.label()
        );
        let _ = writeln!(
            buffer,
            "  <text x=\"{value_x}\" y=\"{baseline}\" text-anchor=\"end\" dominant-baseline=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"14\" font-weight=\"700\" fill=\"{accent}\">{}</text>",
            format_number(field.value(stats))
        );
    }

    close_card(&mut buffer);
    buffer
}
