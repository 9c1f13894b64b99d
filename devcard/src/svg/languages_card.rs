// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Top languages card with proportional bars.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{
    card::{CARD_PADDING, CardFrame, DEFAULT_CARD_WIDTH, card_height, close_card, open_card, row_top},
    markup::{FONT_FAMILY, coord, escape_xml}
};
use crate::{
    model::{Language, LanguagesData},
    theme::Theme
};

/// Languages shown when no count is configured.
pub const DEFAULT_LANGUAGE_COUNT: usize = 5;

const BAR_HEIGHT: u32 = 6;
const BAR_RADIUS: u32 = 3;
const SWATCH_RADIUS: u32 = 5;
const SWATCH_GAP: u32 = 8;
const EMPTY_STATE: &str = "No language data available";

/// Row density of the languages card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguagesLayout {
    #[default]
    Default,
    Compact
}

impl LanguagesLayout {
    /// Height of one language row.
    pub fn row_height(self) -> u32 {
        match self {
            Self::Default => 36,
            Self::Compact => 30
        }
    }

    fn bar_offset(self) -> u32 {
        match self {
            Self::Default => 24,
            Self::Compact => 20
        }
    }
}

/// Presentation knobs of the languages card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagesCardOptions {
    /// Name shown in the title.
    pub username: String,
    /// Language names left out, compared case-insensitively.
    pub hide:     Vec<String>,
    /// Maximum number of rows.
    pub count:    usize,
    /// Row spacing variant.
    pub layout:   LanguagesLayout,
    /// Card width in pixels.
    pub width:    u32
}

impl Default for LanguagesCardOptions {
    fn default() -> Self {
        Self {
            username: String::new(),
            hide:     Vec::new(),
            count:    DEFAULT_LANGUAGE_COUNT,
            layout:   LanguagesLayout::Default,
            width:    DEFAULT_CARD_WIDTH
        }
    }
}

impl LanguagesCardOptions {
    /// Languages that remain after hiding and truncation, largest first.
    pub fn visible_languages<'a>(&self, data: &'a LanguagesData) -> Vec<&'a Language> {
        data.languages
            .iter()
            .filter(|language| {
                !self
                    .hide
                    .iter()
                    .any(|hidden| hidden.eq_ignore_ascii_case(&language.name))
            })
            .take(self.count)
            .collect()
    }
}

/// Renders the languages card.
///
/// Percentages come from the record as-is; hidden languages do not cause
/// the remaining ones to be rescaled.
pub fn render_languages_card(
    data: &LanguagesData,
    options: &LanguagesCardOptions,
    theme: &Theme
) -> String {
    let languages = options.visible_languages(data);
    let width = options.width;
    let row_height = options.layout.row_height();
    let height = card_height(languages.len(), row_height);
    let title = format!("{}'s Top Languages", options.username);
    let text_color = escape_xml(&theme.text);

    let mut buffer = String::with_capacity(4096);
    open_card(
        &mut buffer,
        &CardFrame {
            width,
            height,
            title: &title,
            gradient_id: "languagesGradient",
            divider_inset: 0
        },
        theme
    );

    if languages.is_empty() {
        let _ = writeln!(
            buffer,
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"14\" fill=\"{text_color}\" opacity=\"0.7\">{EMPTY_STATE}</text>",
            width / 2,
            row_top(0, row_height) + CARD_PADDING
        );
        close_card(&mut buffer);
        return buffer;
    }

    let bar_width = width.saturating_sub(2 * CARD_PADDING);
    let label_x = CARD_PADDING + 2 * SWATCH_RADIUS + SWATCH_GAP;
    let value_x = width.saturating_sub(CARD_PADDING);
    let accent = escape_xml(&theme.accent);
    let track = escape_xml(&theme.progress_bar_background);

    for (index, language) in languages.iter().enumerate() {
        let top = row_top(index, row_height);
        let text_y = top + 10;
        let bar_y = top + options.layout.bar_offset();
        let color = if language.color.is_empty() {
            escape_xml(&theme.secondary)
        } else {
            escape_xml(&language.color)
        };
        let filled = (language.percentage / 100.0).clamp(0.0, 1.0) * f64::from(bar_width);

        let _ = writeln!(
            buffer,
            "  <circle cx=\"{}\" cy=\"{text_y}\" r=\"{SWATCH_RADIUS}\" fill=\"{color}\"/>",
            CARD_PADDING + SWATCH_RADIUS
        );
        let _ = writeln!(
            buffer,
            "  <text x=\"{label_x}\" y=\"{text_y}\" dominant-baseline=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"13\" font-weight=\"600\" fill=\"{text_color}\">{}</text>",
            escape_xml(&language.name)
        );
        let _ = writeln!(
            buffer,
            "  <text x=\"{value_x}\" y=\"{text_y}\" text-anchor=\"end\" dominant-baseline=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"13\" font-weight=\"700\" fill=\"{accent}\">{:.1}%</text>",
            language.percentage
        );
        let _ = writeln!(
            buffer,
            "  <rect x=\"{CARD_PADDING}\" y=\"{bar_y}\" width=\"{bar_width}\" height=\"{BAR_HEIGHT}\" rx=\"{BAR_RADIUS}\" fill=\"{track}\"/>"
        );
        let _ = writeln!(
            buffer,
            "  <rect x=\"{CARD_PADDING}\" y=\"{bar_y}\" width=\"{}\" height=\"{BAR_HEIGHT}\" rx=\"{BAR_RADIUS}\" fill=\"{color}\"/>",
            coord(filled)
        );
    }

    close_card(&mut buffer);
    buffer
}
