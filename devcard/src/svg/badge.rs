// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Two-box counter badge.
//!
//! The visitor and contribution badges share this renderer; they differ only
//! in their [`BadgeOptions`].

use std::fmt::Write as _;

use super::{
    icons::render_icon,
    markup::{FONT_FAMILY, coord, drop_shadow, escape_xml, format_number, linear_gradient, open_svg}
};
use crate::theme::Theme;

/// Horizontal padding on each side of both boxes.
pub const BADGE_PADDING: u32 = 10;
/// Edge length of the label icon.
pub const BADGE_ICON_SIZE: u32 = 14;
/// Gap between the icon and the label text.
pub const BADGE_ICON_GAP: u32 = 6;
/// Default badge height.
pub const DEFAULT_BADGE_HEIGHT: u32 = 28;

const LABEL_CHAR_WIDTH: u32 = 7;
const COUNTER_CHAR_WIDTH: u32 = 10;
const MIN_COUNTER_WIDTH: u32 = 40;
const CORNER_RADIUS: u32 = 5;
const SHINE_RATIO: f64 = 0.4;

/// Presentation knobs of a counter badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeOptions {
    /// Text of the left box.
    pub label:  String,
    /// Icon drawn left of the label.
    pub icon:   Option<String>,
    /// Badge height in pixels.
    pub height: u32
}

impl BadgeOptions {
    /// Preset for the profile visitor counter.
    pub fn visitor() -> Self {
        Self {
            label:  "visitors".to_owned(),
            icon:   Some("eye".to_owned()),
            height: DEFAULT_BADGE_HEIGHT
        }
    }

    /// Preset for the active-days badge.
    pub fn contribution() -> Self {
        Self {
            label:  "active days".to_owned(),
            icon:   Some("flame".to_owned()),
            height: DEFAULT_BADGE_HEIGHT
        }
    }
}

/// Box geometry of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeLayout {
    /// Width of the label box, icon included.
    pub label_width:   u32,
    /// Width of the counter box, never below the minimum.
    pub counter_width: u32,
    /// Height of both boxes.
    pub height:        u32
}

impl BadgeLayout {
    /// Computes both box widths from the label and the formatted counter.
    ///
    /// Widths are estimated from character counts; no font metrics are
    /// involved.
    pub fn compute(label: &str, counter: &str, with_icon: bool, height: u32) -> Self {
        let icon_margin = if with_icon {
            BADGE_ICON_SIZE + BADGE_ICON_GAP
        } else {
            0
        };
        let label_width = char_count(label)
            .saturating_mul(LABEL_CHAR_WIDTH)
            .saturating_add(2 * BADGE_PADDING + icon_margin);
        let counter_width = char_count(counter)
            .saturating_mul(COUNTER_CHAR_WIDTH)
            .saturating_add(2 * BADGE_PADDING)
            .max(MIN_COUNTER_WIDTH);

        Self {
            label_width,
            counter_width,
            height
        }
    }

    /// Width of the whole badge.
    pub fn total_width(&self) -> u32 {
        self.label_width.saturating_add(self.counter_width)
    }
}

fn char_count(value: &str) -> u32 {
    u32::try_from(value.chars().count()).unwrap_or(u32::MAX)
}

/// Renders a counter badge.
///
/// # Examples
///
/// ```
/// use devcard::{BadgeOptions, Theme, render_badge};
///
/// let svg = render_badge(1_500, &BadgeOptions::visitor(), &Theme::resolve("dark"));
/// assert!(svg.contains(">1.5k</text>"));
/// ```
pub fn render_badge(value: u64, options: &BadgeOptions, theme: &Theme) -> String {
    let counter = format_number(value);
    let height = options.height;
    let icon = options.icon.as_deref().and_then(|name| {
        let offset = (f64::from(height) - f64::from(BADGE_ICON_SIZE)) / 2.0;
        render_icon(
            name,
            f64::from(BADGE_PADDING),
            offset,
            BADGE_ICON_SIZE,
            &theme.accent
        )
    });
    let layout = BadgeLayout::compute(&options.label, &counter, icon.is_some(), height);
    let width = layout.total_width();
    let middle = coord(f64::from(height) / 2.0);
    let label_x = BADGE_PADDING
        + if icon.is_some() {
            BADGE_ICON_SIZE + BADGE_ICON_GAP
        } else {
            0
        };
    let counter_x = coord(f64::from(layout.label_width) + f64::from(layout.counter_width) / 2.0);
    let label = escape_xml(&options.label);

    let mut buffer = String::with_capacity(2048);
    open_svg(
        &mut buffer,
        width,
        height,
        &format!("{}: {counter}", options.label)
    );
    buffer.push_str("  <defs>\n");
    linear_gradient(&mut buffer, "countGradient", &theme.accent, &theme.secondary);
    drop_shadow(&mut buffer, "shadow", 1, 2, 0.3);
    buffer.push_str("  </defs>\n");

    let _ = writeln!(
        buffer,
        "  <rect width=\"{width}\" height=\"{height}\" rx=\"{CORNER_RADIUS}\" fill=\"{}\" stroke=\"{}\"/>",
        escape_xml(&theme.background),
        escape_xml(&theme.border)
    );
    let _ = writeln!(
        buffer,
        "  <rect x=\"{}\" width=\"{}\" height=\"{height}\" rx=\"{CORNER_RADIUS}\" fill=\"url(#countGradient)\" filter=\"url(#shadow)\"/>",
        layout.label_width, layout.counter_width
    );
    let _ = writeln!(
        buffer,
        "  <rect x=\"{}\" width=\"{}\" height=\"{}\" rx=\"{CORNER_RADIUS}\" fill=\"#ffffff\" opacity=\"0.15\"/>",
        layout.label_width,
        layout.counter_width,
        coord(f64::from(height) * SHINE_RATIO)
    );

    if let Some(icon) = &icon {
        let _ = writeln!(buffer, "  {icon}");
    }

    let _ = writeln!(
        buffer,
        "  <text x=\"{label_x}\" y=\"{middle}\" dominant-baseline=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"11\" font-weight=\"600\" fill=\"{}\">{label}</text>",
        escape_xml(&theme.text)
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"{counter_x}\" y=\"{middle}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"13\" font-weight=\"700\" fill=\"#ffffff\">{counter}</text>"
    );
    buffer.push_str("</svg>\n");

    buffer
}
