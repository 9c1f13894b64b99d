// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::fmt::Write as _;

use super::markup::{FONT_FAMILY, drop_shadow, escape_xml, linear_gradient, open_svg};
use crate::theme::Theme;

/// Inner padding of every card.
pub const CARD_PADDING: u32 = 20;
/// Height of the title band.
pub const TITLE_HEIGHT: u32 = 40;
/// Extra space below the last row.
pub const CARD_MARGIN: u32 = 20;
/// Default card width.
pub const DEFAULT_CARD_WIDTH: u32 = 500;
/// Edge length of row icons.
pub const ROW_ICON_SIZE: u32 = 16;

/// Card height for `rows` visible rows of `row_height` pixels.
///
/// # Examples
///
/// ```
/// use devcard::card_height;
///
/// assert_eq!(card_height(5, 30), 40 + 150 + 40 + 20);
/// assert_eq!(card_height(0, 36), 100);
/// ```
pub fn card_height(rows: usize, row_height: u32) -> u32 {
    let rows = u32::try_from(rows).unwrap_or(u32::MAX);
    TITLE_HEIGHT
        .saturating_add(rows.saturating_mul(row_height))
        .saturating_add(2 * CARD_PADDING)
        .saturating_add(CARD_MARGIN)
}

/// Top edge of the row at `index`.
pub(crate) fn row_top(index: usize, row_height: u32) -> u32 {
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    TITLE_HEIGHT + CARD_PADDING + index.saturating_mul(row_height)
}

pub(crate) struct CardFrame<'a> {
    pub width:         u32,
    pub height:        u32,
    pub title:         &'a str,
    pub gradient_id:   &'a str,
    /// Space kept free at the right end of the divider.
    pub divider_inset: u32
}

/// Writes the card background, title and divider.
pub(crate) fn open_card(buffer: &mut String, frame: &CardFrame<'_>, theme: &Theme) {
    let CardFrame {
        width,
        height,
        title,
        gradient_id,
        divider_inset
    } = *frame;

    open_svg(buffer, width, height, title);
    buffer.push_str("  <defs>\n");
    linear_gradient(
        buffer,
        gradient_id,
        &theme.background,
        &theme.progress_bar_background
    );
    drop_shadow(buffer, "cardShadow", 2, 4, 0.2);
    buffer.push_str("  </defs>\n");

    let _ = writeln!(
        buffer,
        "  <rect x=\"0.5\" y=\"0.5\" width=\"{}\" height=\"{}\" rx=\"10\" fill=\"url(#{gradient_id})\" stroke=\"{}\" filter=\"url(#cardShadow)\"/>",
        width.saturating_sub(1),
        height.saturating_sub(1),
        escape_xml(&theme.border)
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"{CARD_PADDING}\" y=\"{TITLE_HEIGHT}\" font-family=\"{FONT_FAMILY}\" font-size=\"18\" font-weight=\"700\" fill=\"{}\">{}</text>",
        escape_xml(&theme.text),
        escape_xml(title)
    );
    let _ = writeln!(
        buffer,
        "  <line x1=\"{CARD_PADDING}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"{}\" stroke-width=\"1\" opacity=\"0.3\"/>",
        width.saturating_sub(CARD_PADDING + divider_inset),
        escape_xml(&theme.border),
        y = TITLE_HEIGHT + CARD_PADDING
    );
}

pub(crate) fn close_card(buffer: &mut String) {
    buffer.push_str("</svg>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_is_linear_in_rows() {
        for rows in 0..10 {
            assert_eq!(card_height(rows + 1, 30) - card_height(rows, 30), 30);
        }
        assert_eq!(card_height(0, 30), TITLE_HEIGHT + 2 * CARD_PADDING + CARD_MARGIN);
    }

    #[test]
    fn rows_start_below_the_divider() {
        assert_eq!(row_top(0, 30), 60);
        assert_eq!(row_top(2, 36), 132);
    }

    #[test]
    fn frame_is_well_formed_once_closed() {
        let mut buffer = String::new();
        let frame = CardFrame {
            width:         400,
            height:        card_height(1, 30),
            title:         "Tom & Jerry",
            gradient_id:   "testGradient",
            divider_inset: 0
        };
        open_card(&mut buffer, &frame, &Theme::default());
        close_card(&mut buffer);

        let document = roxmltree::Document::parse(&buffer).expect("well formed");
        assert_eq!(document.root_element().attribute("height"), Some("130"));
        assert!(buffer.contains(">Tom &amp; Jerry</text>"));
        assert!(buffer.contains("fill=\"url(#testGradient)\""));
    }
}
