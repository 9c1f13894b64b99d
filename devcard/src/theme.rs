// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Color palettes applied to every badge and card.
//!
//! Resolution is total: any name that is not in the fixed table yields the
//! default palette, so rendering never fails because of a theme.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Name used when the caller does not request a theme.
pub const DEFAULT_THEME: &str = "default";

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
        .expect("hex color pattern is valid")
});

/// Seven-color palette consumed by the SVG layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// Card background.
    pub background:              String,
    /// Primary text color.
    pub text:                    String,
    /// Accent used for values, the rank circle and gradient start.
    pub accent:                  String,
    /// Secondary accent used for icons and gradient end.
    pub secondary:               String,
    /// Borders, dividers and the badge label box.
    pub border:                  String,
    /// Track of the language progress bars.
    pub progress_bar_background: String,
    /// Fill of the language progress bars.
    pub progress_bar_fill:       String
}

impl Theme {
    /// Resolves a palette by name.
    ///
    /// Known names are `default`, `dark` (alias of `default`) and `light`.
    /// Matching is case-insensitive and ignores surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use devcard::Theme;
    ///
    /// assert_eq!(Theme::resolve("light").background, "#ffffff");
    /// assert_eq!(Theme::resolve("neon"), Theme::resolve("default"));
    /// ```
    pub fn resolve(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark()
        }
    }

    /// Returns a copy of the palette with the provided overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when an override is not a hex color.
    pub fn with_overrides(mut self, overrides: &ColorOverrides) -> Result<Self, Error> {
        let slots = [
            ("background", &overrides.background, &mut self.background),
            ("text", &overrides.text, &mut self.text),
            ("accent", &overrides.accent, &mut self.accent),
            ("secondary", &overrides.secondary, &mut self.secondary),
            ("border", &overrides.border, &mut self.border),
            (
                "progress_bar_background",
                &overrides.progress_bar_background,
                &mut self.progress_bar_background
            ),
            (
                "progress_bar_fill",
                &overrides.progress_bar_fill,
                &mut self.progress_bar_fill
            )
        ];

        for (field, candidate, slot) in slots {
            if let Some(color) = candidate {
                if !is_hex_color(color) {
                    return Err(Error::configuration(format!(
                        "colors.{field} must be a hex color, got '{color}'"
                    )));
                }
                *slot = color.clone();
            }
        }

        Ok(self)
    }

    fn dark() -> Self {
        Self {
            background:              "#0d1117".to_owned(),
            text:                    "#c9d1d9".to_owned(),
            accent:                  "#58a6ff".to_owned(),
            secondary:               "#1f6feb".to_owned(),
            border:                  "#30363d".to_owned(),
            progress_bar_background: "#21262d".to_owned(),
            progress_bar_fill:       "#58a6ff".to_owned()
        }
    }

    fn light() -> Self {
        Self {
            background:              "#ffffff".to_owned(),
            text:                    "#24292f".to_owned(),
            accent:                  "#0969da".to_owned(),
            secondary:               "#0550ae".to_owned(),
            border:                  "#d0d7de".to_owned(),
            progress_bar_background: "#eaeef2".to_owned(),
            progress_bar_fill:       "#0969da".to_owned()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::resolve(DEFAULT_THEME)
    }
}

/// Optional per-color overrides read from the configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ColorOverrides {
    #[serde(default)]
    pub background:              Option<String>,
    #[serde(default)]
    pub text:                    Option<String>,
    #[serde(default)]
    pub accent:                  Option<String>,
    #[serde(default)]
    pub secondary:               Option<String>,
    #[serde(default)]
    pub border:                  Option<String>,
    #[serde(default)]
    pub progress_bar_background: Option<String>,
    #[serde(default)]
    pub progress_bar_fill:       Option<String>
}

fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}
