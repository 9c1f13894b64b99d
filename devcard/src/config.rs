// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Optional YAML configuration document.
//!
//! Every section and field is optional; anything left out keeps the
//! renderer presets. Values outside the documented ranges, unknown keys,
//! unknown icons and malformed colors are rejected while loading so a bad
//! file fails the run before any output is produced.

use std::{fs, path::Path};

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::{
    aggregate::REPOSITORY_CAP,
    error::{self, Error},
    svg::{BadgeOptions, LanguagesCardOptions, LanguagesLayout, StatField, StatsCardOptions, has_icon},
    theme::{ColorOverrides, Theme}
};

/// Theme applied when neither the command line nor the file names one.
pub const FALLBACK_THEME: &str = "dark";

/// Root configuration document.
///
/// # Examples
///
/// ```
/// use devcard::parse_config;
///
/// let yaml = r#"
/// theme: light
/// visitor:
///   label: views
/// languages:
///   count: 8
///   layout: compact
/// "#;
/// let config = parse_config(yaml).expect("valid configuration");
/// assert_eq!(config.visitor_badge().label, "views");
/// assert_eq!(config.languages_card("octocat").count, 8);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevcardConfig {
    /// Palette name, overridden by the command line.
    #[serde(default)]
    pub theme:        Option<String>,
    /// Per-color overrides applied on top of the palette.
    #[serde(default)]
    pub colors:       ColorOverrides,
    #[serde(default)]
    pub visitor:      BadgeSection,
    #[serde(default)]
    pub contribution: BadgeSection,
    #[serde(default)]
    pub stats:        StatsSection,
    #[serde(default)]
    pub languages:    LanguagesSection
}

/// Overrides of a counter badge preset.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BadgeSection {
    #[serde(default)]
    pub label:  Option<String>,
    /// Icon name, or an empty string to draw no icon.
    #[serde(default)]
    pub icon:   Option<String>,
    /// Height constrained to `16..=64` pixels.
    #[serde(default, deserialize_with = "deserialize_badge_height")]
    pub height: Option<u32>
}

/// Overrides of the stats card.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StatsSection {
    #[serde(default)]
    pub hide:       Vec<StatField>,
    #[serde(default)]
    pub show_icons: Option<bool>,
    /// Width constrained to `300..=1000` pixels.
    #[serde(default, deserialize_with = "deserialize_card_width")]
    pub width:      Option<u32>
}

/// Overrides of the languages card and its aggregation.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LanguagesSection {
    #[serde(default)]
    pub hide:             Vec<String>,
    /// Row count constrained to `1..=20`.
    #[serde(default, deserialize_with = "deserialize_language_count")]
    pub count:            Option<usize>,
    #[serde(default)]
    pub layout:           Option<LanguagesLayout>,
    /// Width constrained to `300..=1000` pixels.
    #[serde(default, deserialize_with = "deserialize_card_width")]
    pub width:            Option<u32>,
    /// Repository visit cap constrained to `1..=1000`.
    #[serde(default, deserialize_with = "deserialize_max_repositories")]
    pub max_repositories: Option<usize>
}

impl BadgeSection {
    fn apply(&self, preset: BadgeOptions) -> BadgeOptions {
        BadgeOptions {
            label:  self.label.clone().unwrap_or(preset.label),
            icon:   match self.icon.as_deref() {
                None => preset.icon,
                Some("") => None,
                Some(name) => Some(name.to_owned())
            },
            height: self.height.unwrap_or(preset.height)
        }
    }

    fn validate(&self, section: &str) -> Result<(), Error> {
        match self.icon.as_deref() {
            Some(name) if !name.is_empty() && !has_icon(name) => Err(Error::configuration(format!(
                "{section}.icon '{name}' is not a known icon"
            ))),
            _ => Ok(())
        }
    }
}

impl DevcardConfig {
    /// Resolves the palette.
    ///
    /// The command line theme wins over the file, which wins over
    /// [`FALLBACK_THEME`]. Color overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when a color override is not a hex
    /// color.
    pub fn theme(&self, cli_theme: Option<&str>) -> Result<Theme, Error> {
        let name = cli_theme
            .or(self.theme.as_deref())
            .unwrap_or(FALLBACK_THEME);
        Theme::resolve(name).with_overrides(&self.colors)
    }

    /// Visitor badge options with file overrides applied.
    pub fn visitor_badge(&self) -> BadgeOptions {
        self.visitor.apply(BadgeOptions::visitor())
    }

    /// Contribution badge options with file overrides applied.
    pub fn contribution_badge(&self) -> BadgeOptions {
        self.contribution.apply(BadgeOptions::contribution())
    }

    /// Stats card options for `username`.
    pub fn stats_card(&self, username: &str) -> StatsCardOptions {
        let preset = StatsCardOptions::default();
        StatsCardOptions {
            username:   username.to_owned(),
            hide:       self.stats.hide.clone(),
            show_icons: self.stats.show_icons.unwrap_or(preset.show_icons),
            width:      self.stats.width.unwrap_or(preset.width)
        }
    }

    /// Languages card options for `username`.
    pub fn languages_card(&self, username: &str) -> LanguagesCardOptions {
        let preset = LanguagesCardOptions::default();
        LanguagesCardOptions {
            username: username.to_owned(),
            hide:     self.languages.hide.clone(),
            count:    self.languages.count.unwrap_or(preset.count),
            layout:   self.languages.layout.unwrap_or(preset.layout),
            width:    self.languages.width.unwrap_or(preset.width)
        }
    }

    /// Upper bound on repositories visited by the language aggregation.
    pub fn repository_cap(&self) -> usize {
        self.languages.max_repositories.unwrap_or(REPOSITORY_CAP)
    }

    fn validate(&self) -> Result<(), Error> {
        self.visitor.validate("visitor")?;
        self.contribution.validate("contribution")?;
        Theme::default().with_overrides(&self.colors)?;
        Ok(())
    }
}

/// Parses and validates a configuration document.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed YAML, unknown keys and
/// out-of-range values, and [`Error::Configuration`] for unknown icons or
/// invalid colors.
pub fn parse_config(yaml: &str) -> Result<DevcardConfig, Error> {
    let config: DevcardConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

/// Reads and validates the configuration file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and the errors of
/// [`parse_config`] otherwise.
pub fn load_config(path: &Path) -> Result<DevcardConfig, Error> {
    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    let config = parse_config(&contents)?;
    debug!(path = %path.display(), "loaded configuration file");
    Ok(config)
}

fn deserialize_in_range<'de, D, T>(
    deserializer: D,
    field: &str,
    range: std::ops::RangeInclusive<T>
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + PartialOrd + std::fmt::Display
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    if let Some(candidate) = &value
        && !range.contains(candidate)
    {
        return Err(serde::de::Error::custom(format!(
            "{field} must be between {} and {}, got {candidate}",
            range.start(),
            range.end()
        )));
    }
    Ok(value)
}

fn deserialize_badge_height<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>
{
    deserialize_in_range(deserializer, "badge height", 16..=64)
}

fn deserialize_card_width<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>
{
    deserialize_in_range(deserializer, "card width", 300..=1000)
}

fn deserialize_language_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>
{
    deserialize_in_range(deserializer, "languages.count", 1..=20)
}

fn deserialize_max_repositories<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>
{
    deserialize_in_range(deserializer, "languages.max_repositories", 1..=1000)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn empty_document_keeps_presets() {
        let config = parse_config("{}").expect("empty configuration is valid");

        assert_eq!(config.visitor_badge(), BadgeOptions::visitor());
        assert_eq!(config.contribution_badge(), BadgeOptions::contribution());
        assert_eq!(config.stats_card("octocat").width, 500);
        assert_eq!(config.languages_card("octocat").count, 5);
        assert_eq!(config.repository_cap(), REPOSITORY_CAP);
        assert_eq!(
            config.theme(None).expect("valid theme"),
            Theme::resolve(FALLBACK_THEME)
        );
    }

    #[test]
    fn full_document_is_applied() {
        let yaml = r##"
theme: light
colors:
  accent: "#ff8800"
visitor:
  label: views
  icon: heart
  height: 32
contribution:
  icon: ""
stats:
  hide: [totalStars, totalPRs]
  show_icons: false
  width: 420
languages:
  hide: [HTML]
  count: 3
  layout: compact
  width: 640
  max_repositories: 50
"##;
        let config = parse_config(yaml).expect("valid configuration");

        let theme = config.theme(None).expect("valid theme");
        assert_eq!(theme.background, "#ffffff");
        assert_eq!(theme.accent, "#ff8800");

        let visitor = config.visitor_badge();
        assert_eq!(visitor.label, "views");
        assert_eq!(visitor.icon.as_deref(), Some("heart"));
        assert_eq!(visitor.height, 32);
        assert_eq!(config.contribution_badge().icon, None);

        let stats = config.stats_card("octocat");
        assert_eq!(stats.hide, [StatField::TotalStars, StatField::TotalPrs]);
        assert!(!stats.show_icons);
        assert_eq!(stats.width, 420);

        let languages = config.languages_card("octocat");
        assert_eq!(languages.hide, ["HTML"]);
        assert_eq!(languages.count, 3);
        assert_eq!(languages.layout, LanguagesLayout::Compact);
        assert_eq!(config.repository_cap(), 50);
    }

    #[test]
    fn command_line_theme_wins() {
        let config = parse_config("theme: light").expect("valid configuration");
        assert_eq!(
            config.theme(Some("dark")).expect("valid theme"),
            Theme::resolve("dark")
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for yaml in [
            "visitor: { height: 8 }",
            "stats: { width: 1200 }",
            "languages: { count: 0 }",
            "languages: { count: 21 }",
            "languages: { max_repositories: 5000 }"
        ] {
            let error = parse_config(yaml).expect_err("value must be rejected");
            assert!(matches!(error, Error::Parse { .. }), "{yaml}: {error:?}");
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            parse_config("visitors: {}"),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            parse_config("stats: { hide: [followers] }"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn unknown_icon_is_a_configuration_error() {
        let error = parse_config("visitor: { icon: unicorn }").expect_err("unknown icon");
        assert!(matches!(error, Error::Configuration { .. }));
    }

    #[test]
    fn invalid_color_is_a_configuration_error() {
        let error = parse_config("colors: { text: red }").expect_err("invalid color");
        assert!(matches!(error, Error::Configuration { .. }));
    }

    #[test]
    fn load_config_reads_files() {
        let mut file = NamedTempFile::new().expect("failed to create temp file");
        writeln!(file, "languages:\n  count: 7").expect("failed to write config");

        let config = load_config(file.path()).expect("valid configuration");
        assert_eq!(config.languages_card("octocat").count, 7);
    }

    #[test]
    fn load_config_reports_missing_files() {
        let error =
            load_config(Path::new("/definitely/missing/devcard.yaml")).expect_err("missing file");
        assert!(matches!(error, Error::Io { .. }));
    }
}
