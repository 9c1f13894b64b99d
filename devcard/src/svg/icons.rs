// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Stroke icon library.
//!
//! Every icon is drawn on a 24x24 grid with `currentColor` strokes. Rendering
//! scales the fragment to the requested size and substitutes the color.

use tracing::warn;

use super::markup::{coord, escape_xml};

/// Native edge length of every icon.
pub const ICON_GRID: f64 = 24.0;

const STROKE_ATTRIBUTES: &str = "fill=\"none\" stroke=\"currentColor\" stroke-width=\"2\" stroke-linecap=\"round\" stroke-linejoin=\"round\"";

// Sorted by name for binary search.
const LIBRARY: &[(&str, &str)] = &[
    ("activity", "<polyline points=\"22 12 18 12 15 21 9 3 6 12 2 12\"/>"),
    (
        "award",
        "<circle cx=\"12\" cy=\"8\" r=\"6\"/><path d=\"M15.477 12.89 17 22l-5-3-5 3 1.523-9.11\"/>"
    ),
    (
        "calendar",
        "<rect width=\"18\" height=\"18\" x=\"3\" y=\"4\" rx=\"2\" ry=\"2\"/><line x1=\"16\" x2=\"16\" y1=\"2\" y2=\"6\"/><line x1=\"8\" x2=\"8\" y1=\"2\" y2=\"6\"/><line x1=\"3\" x2=\"21\" y1=\"10\" y2=\"10\"/>"
    ),
    (
        "circle-dot",
        "<circle cx=\"12\" cy=\"12\" r=\"10\"/><circle cx=\"12\" cy=\"12\" r=\"1\"/>"
    ),
    (
        "code",
        "<polyline points=\"16 18 22 12 16 6\"/><polyline points=\"8 6 2 12 8 18\"/>"
    ),
    (
        "eye",
        "<path d=\"M2 12s3-7 10-7 10 7 10 7-3 7-10 7-10-7-10-7Z\"/><circle cx=\"12\" cy=\"12\" r=\"3\"/>"
    ),
    (
        "flame",
        "<path d=\"M8.5 14.5A2.5 2.5 0 0 0 11 12c0-1.38-.5-2-1-3-1.072-2.143-.224-4.054 2-6 .5 2.5 2 4.9 4 6.5 2 1.6 3 3.5 3 5.5a7 7 0 1 1-14 0c0-1.153.433-2.294 1-3a2.5 2.5 0 0 0 2.5 2.5z\"/>"
    ),
    (
        "git-branch",
        "<line x1=\"6\" x2=\"6\" y1=\"3\" y2=\"15\"/><circle cx=\"18\" cy=\"6\" r=\"3\"/><circle cx=\"6\" cy=\"18\" r=\"3\"/><path d=\"M18 9a9 9 0 0 1-9 9\"/>"
    ),
    (
        "git-commit",
        "<circle cx=\"12\" cy=\"12\" r=\"3\"/><line x1=\"3\" x2=\"9\" y1=\"12\" y2=\"12\"/><line x1=\"15\" x2=\"21\" y1=\"12\" y2=\"12\"/>"
    ),
    (
        "git-pull-request",
        "<circle cx=\"18\" cy=\"18\" r=\"3\"/><circle cx=\"6\" cy=\"6\" r=\"3\"/><path d=\"M13 6h3a2 2 0 0 1 2 2v7\"/><line x1=\"6\" x2=\"6\" y1=\"9\" y2=\"21\"/>"
    ),
    (
        "heart",
        "<path d=\"M19 14c1.49-1.46 3-3.21 3-5.5A5.5 5.5 0 0 0 16.5 3c-1.76 0-3 .5-4.5 2-1.5-1.5-2.74-2-4.5-2A5.5 5.5 0 0 0 2 8.5c0 2.3 1.5 4.05 3 5.5l7 7Z\"/>"
    ),
    (
        "sparkles",
        "<path d=\"M9.937 15.5A2 2 0 0 0 8.5 14.063l-6.135-1.582a.5.5 0 0 1 0-.962L8.5 9.936A2 2 0 0 0 9.937 8.5l1.582-6.135a.5.5 0 0 1 .963 0L14.063 8.5A2 2 0 0 0 15.5 9.937l6.135 1.581a.5.5 0 0 1 0 .964L15.5 14.063a2 2 0 0 0-1.437 1.437l-1.582 6.135a.5.5 0 0 1-.963 0z\"/><path d=\"M20 3v4\"/><path d=\"M22 5h-4\"/><path d=\"M4 17v2\"/><path d=\"M5 18H3\"/>"
    ),
    (
        "star",
        "<polygon points=\"12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2\"/>"
    ),
    (
        "target",
        "<circle cx=\"12\" cy=\"12\" r=\"10\"/><circle cx=\"12\" cy=\"12\" r=\"6\"/><circle cx=\"12\" cy=\"12\" r=\"2\"/>"
    ),
    (
        "thumbs-up",
        "<path d=\"M7 10v12\"/><path d=\"M15 5.88 14 10h5.83a2 2 0 0 1 1.92 2.56l-2.33 8A2 2 0 0 1 17.5 22H4a2 2 0 0 1-2-2v-8a2 2 0 0 1 2-2h2.76a2 2 0 0 0 1.79-1.11L12 2a3.13 3.13 0 0 1 3 3.88Z\"/>"
    ),
    (
        "trending-up",
        "<polyline points=\"22 7 13.5 15.5 8.5 10.5 2 17\"/><polyline points=\"16 7 22 7 22 13\"/>"
    ),
    (
        "trophy",
        "<path d=\"M6 9H4.5a2.5 2.5 0 0 1 0-5H6\"/><path d=\"M18 9h1.5a2.5 2.5 0 0 0 0-5H18\"/><path d=\"M4 22h16\"/><path d=\"M10 14.66V17c0 .55-.47.98-.97 1.21C7.85 18.75 7 20.24 7 22\"/><path d=\"M14 14.66V17c0 .55.47.98.97 1.21C16.15 18.75 17 20.24 17 22\"/><path d=\"M18 2H6v7a6 6 0 0 0 12 0V2Z\"/>"
    ),
    ("zap", "<polygon points=\"13 2 3 14 12 14 11 22 21 10 12 10 13 2\"/>")
];

/// Names of every icon in the library, alphabetically.
pub fn icon_names() -> impl Iterator<Item = &'static str> {
    LIBRARY.iter().map(|(name, _)| *name)
}

/// Returns `true` when `name` is part of the library.
pub fn has_icon(name: &str) -> bool {
    lookup(name).is_some()
}

fn lookup(name: &str) -> Option<&'static str> {
    LIBRARY
        .binary_search_by(|(candidate, _)| (*candidate).cmp(name))
        .ok()
        .map(|position| LIBRARY[position].1)
}

/// Renders a positioned, scaled and recolored icon group.
///
/// Returns `None` and logs a warning when the icon is unknown; callers
/// render nothing in its place.
///
/// # Examples
///
/// ```
/// use devcard::render_icon;
///
/// let star = render_icon("star", 10.0, 5.0, 16, "#ffcc00").expect("known icon");
/// assert!(star.contains("#ffcc00"));
/// assert!(render_icon("unicorn", 0.0, 0.0, 16, "#fff").is_none());
/// ```
pub fn render_icon(name: &str, x: f64, y: f64, size: u32, color: &str) -> Option<String> {
    let Some(fragment) = lookup(name) else {
        warn!(icon = name, "unknown icon, rendering nothing");
        return None;
    };

    let scale = f64::from(size) / ICON_GRID;
    let group = format!(
        "<g transform=\"translate({}, {}) scale({})\" {STROKE_ATTRIBUTES}>{fragment}</g>",
        coord(x),
        coord(y),
        coord(scale)
    );

    Some(group.replace("currentColor", &escape_xml(color)))
}
