// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the devcard binary.
//!
//! The CLI resolves the subject, credential and configuration from flags and
//! the environment, then hands an explicit configuration to the pipeline.

use std::{env, path::PathBuf, process};

use chrono::Utc;
use clap::{ArgAction, Parser};
use devcard::{
    DevcardConfig, Error, FileStorage, GitHubClient, Pipeline, RenderSettings, Service,
    icon_names, load_config
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Render GitHub profile badges and cards as SVG.
#[derive(Debug, Parser)]
#[command(name = "devcard", version, about)]
struct Cli {
    /// GitHub login to render. Falls back to the owner part of
    /// GITHUB_REPOSITORY.
    #[arg(long, env = "GITHUB_REPOSITORY_OWNER", value_name = "LOGIN")]
    user: Option<String>,

    /// Token used for the GraphQL API.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    token: Option<String>,

    /// Palette name (`dark`, `light` or `default`) [default: dark].
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Directory receiving SVG artifacts and stored records.
    #[arg(long, value_name = "DIR", default_value = "data")]
    output: PathBuf,

    /// Badges to produce.
    #[arg(long, value_enum, default_value_t = Service::Contribution)]
    service: Service,

    /// Optional YAML file with presentation overrides.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the names of the available icons and exit.
    #[arg(long = "list-icons", action = ArgAction::SetTrue)]
    list_icons: bool
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    match run().await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("{}", error.to_display_string());
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI.
///
/// Returns `Ok(false)` when at least one badge failed; the failures have
/// already been reported on stderr.
///
/// # Errors
///
/// Returns configuration errors detected before any badge is produced.
async fn run() -> Result<bool, Error> {
    let cli = Cli::parse();

    if cli.list_icons {
        for name in icon_names() {
            println!("{name}");
        }
        return Ok(true);
    }

    let config = match cli.config.as_deref() {
        Some(path) => load_config(path)?,
        None => DevcardConfig::default()
    };
    let user = resolve_user(cli.user.as_deref(), env::var("GITHUB_REPOSITORY").ok().as_deref())?;
    let token = cli
        .token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::configuration("GitHub token is required (--token or GITHUB_TOKEN)"))?;

    let settings = RenderSettings::new(&user, &config, cli.theme.as_deref())?;
    let client = GitHubClient::new(token)?;
    let storage = FileStorage::new(&cli.output);

    info!(user = %settings.username, service = ?cli.service, output = %cli.output.display(), "starting run");
    let report = Pipeline::new(&client, &storage, &settings, &cli.output)
        .run(cli.service, Utc::now())
        .await;

    for outcome in report.failures() {
        if let Err(error) = &outcome.result {
            eprintln!("{}: {}", outcome.badge, error.to_display_string());
        }
    }

    Ok(report.is_success())
}

/// Picks the subject from the explicit login or the `owner/repo` slug.
fn resolve_user(explicit: Option<&str>, repository: Option<&str>) -> Result<String, Error> {
    explicit
        .map(str::trim)
        .filter(|login| !login.is_empty())
        .or_else(|| {
            repository
                .and_then(|slug| slug.split('/').next())
                .map(str::trim)
                .filter(|owner| !owner.is_empty())
        })
        .map(str::to_owned)
        .ok_or_else(|| {
            Error::configuration("GitHub username is required (--user or GITHUB_REPOSITORY_OWNER)")
        })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["devcard", "--user", "octocat", "--token", "t"])
            .expect("valid arguments");
        assert_eq!(cli.output, PathBuf::from("data"));
        assert_eq!(cli.service, Service::Contribution);
        assert_eq!(cli.theme, None);
        assert!(!cli.list_icons);
    }

    #[test]
    fn service_accepts_all() {
        let cli = Cli::try_parse_from(["devcard", "--service", "all"]).expect("valid arguments");
        assert_eq!(cli.service, Service::All);
        assert!(Cli::try_parse_from(["devcard", "--service", "everything"]).is_err());
    }

    #[test]
    fn explicit_user_wins() {
        assert_eq!(
            resolve_user(Some("octocat"), Some("other/repo")).expect("resolved"),
            "octocat"
        );
    }

    #[test]
    fn repository_owner_is_the_fallback() {
        assert_eq!(
            resolve_user(None, Some("octocat/profile")).expect("resolved"),
            "octocat"
        );
        assert_eq!(
            resolve_user(Some("  "), Some("octocat/profile")).expect("resolved"),
            "octocat"
        );
    }

    #[test]
    fn missing_user_is_a_configuration_error() {
        assert!(matches!(
            resolve_user(None, None),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            resolve_user(None, Some("/repo")),
            Err(Error::Configuration { .. })
        ));
    }
}
