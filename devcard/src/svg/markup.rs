// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Shared SVG primitives: escaping, number formatting and reusable
//! definitions.

use std::{borrow::Cow, fmt::Write as _};

/// Font stack used by every text node.
pub const FONT_FAMILY: &str = "-apple-system, BlinkMacSystemFont, Segoe UI, Roboto, sans-serif";

/// Escapes the five XML special characters.
///
/// Characters XML 1.0 cannot carry at all (control characters other than
/// tab, line feed and carriage return, plus `U+FFFE` and `U+FFFF`) are
/// dropped. Returns the input unchanged when nothing needs rewriting.
///
/// # Examples
///
/// ```
/// use devcard::escape_xml;
///
/// assert_eq!(escape_xml("<b>&'\""), "&lt;b&gt;&amp;&apos;&quot;");
/// assert_eq!(escape_xml("plain"), "plain");
/// assert_eq!(escape_xml("views\u{1}"), "views");
/// ```
pub fn escape_xml(value: &str) -> Cow<'_, str> {
    if value.chars().any(|character| {
        matches!(character, '&' | '<' | '>' | '\"' | '\'') || !is_xml_char(character)
    }) {
        let mut escaped = String::with_capacity(value.len() + 8);
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '\"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                other if !is_xml_char(other) => {}
                other => escaped.push(other)
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}

fn is_xml_char(character: char) -> bool {
    !matches!(
        character,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

/// Compacts a counter for display.
///
/// Values from one million use an `M` suffix, values from one thousand a
/// `k` suffix, both with one decimal. Smaller values print as integers.
///
/// # Examples
///
/// ```
/// use devcard::format_number;
///
/// assert_eq!(format_number(999), "999");
/// assert_eq!(format_number(1_500), "1.5k");
/// assert_eq!(format_number(2_300_000), "2.3M");
/// ```
pub fn format_number(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}k", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

/// Formats a coordinate without trailing zeros.
pub(crate) fn coord(value: f64) -> String {
    let mut formatted = format!("{value:.4}");
    if formatted.contains('.') {
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.').len();
        formatted.truncate(trimmed);
    }
    if formatted == "-0" {
        formatted = "0".to_owned();
    }
    formatted
}

/// Writes the root element opening tag.
pub(crate) fn open_svg(buffer: &mut String, width: u32, height: u32, aria_label: &str) {
    let _ = writeln!(
        buffer,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" role=\"img\" aria-label=\"{}\">",
        escape_xml(aria_label)
    );
}

/// Writes a vertical two-stop linear gradient definition.
pub(crate) fn linear_gradient(buffer: &mut String, id: &str, from: &str, to: &str) {
    let _ = writeln!(
        buffer,
        "    <linearGradient id=\"{id}\" x1=\"0%\" y1=\"0%\" x2=\"0%\" y2=\"100%\">\n      <stop offset=\"0%\" stop-color=\"{}\"/>\n      <stop offset=\"100%\" stop-color=\"{}\"/>\n    </linearGradient>",
        escape_xml(from),
        escape_xml(to)
    );
}

/// Writes a drop-shadow filter definition.
pub(crate) fn drop_shadow(buffer: &mut String, id: &str, dy: u32, deviation: u32, opacity: f64) {
    let _ = writeln!(
        buffer,
        "    <filter id=\"{id}\" x=\"-10%\" y=\"-10%\" width=\"120%\" height=\"130%\">\n      <feDropShadow dx=\"0\" dy=\"{dy}\" stdDeviation=\"{deviation}\" flood-opacity=\"{}\"/>\n    </filter>",
        coord(opacity)
    );
}
