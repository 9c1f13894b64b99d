// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Metrics provider boundary.
//!
//! [`MetricsClient`] describes the three feeds the aggregator consumes. The
//! default implementation, [`GitHubClient`], issues GraphQL queries through
//! `octocrab` and maps the responses onto the feed types below. Every
//! request is retried with exponential backoff; a request that still fails
//! is reported as [`Error::Transport`], and a response without the expected
//! data as [`Error::MalformedFeed`].

use async_trait::async_trait;
use chrono::NaiveDate;
use masterror::AppError;
use octocrab::Octocrab;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    aggregate::STAR_REPOSITORY_CAP,
    error::Error,
    retry::{RetryConfig, retry_with_backoff}
};

/// Repositories requested per language page.
pub const LANGUAGE_PAGE_SIZE: u32 = 100;
/// Language edges requested per repository.
pub const LANGUAGES_PER_REPOSITORY: u32 = 10;

/// Contribution calendar grouped by week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    /// Provider total over the whole calendar.
    #[serde(default)]
    pub total_contributions: u64,
    /// Weeks from the oldest to the newest.
    pub weeks:               Vec<CalendarWeek>
}

/// One calendar week, ordered from the oldest day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWeek {
    /// Up to seven days; partial at both ends of the calendar.
    pub contribution_days: Vec<ContributionDay>
}

/// Contribution count of a single day.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    /// Calendar date in the subject's timezone.
    pub date:               NaiveDate,
    /// Contributions recorded on that date.
    pub contribution_count: u64
}

/// Raw totals behind the stats card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsFeed {
    /// Commit contributions in the current collection window.
    pub total_commits:       u64,
    /// Pull requests authored by the subject.
    pub total_pull_requests: u64,
    /// Issues still open.
    pub open_issues:         u64,
    /// Issues already closed.
    pub closed_issues:       u64,
    /// Repositories contributed to by commit, issue, pull request or creation.
    pub contributed_to:      u64,
    /// Stargazer counts of the first page of owned repositories, ordered
    /// by stars descending.
    pub repository_stars:    Vec<u64>
}

/// One page of owned repositories with their language edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryPage {
    /// Repositories in provider order.
    pub repositories: Vec<RepositoryLanguages>,
    /// Continuation of this page.
    pub page_info:    PageInfo
}

/// Cursor continuation signal of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether the provider claims another page.
    pub has_next_page: bool,
    /// Cursor of the next page; missing or empty ends pagination.
    #[serde(default)]
    pub end_cursor:    Option<String>
}

/// Languages reported for a single repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryLanguages {
    /// Repository name without the owner.
    pub name:        String,
    /// Archived repositories count toward the cap but are not merged.
    pub is_archived: bool,
    /// Largest languages first.
    pub languages:   Vec<LanguageEdge>
}

/// Byte size of one language inside a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEdge {
    /// Language name.
    pub name:  String,
    /// Provider color, if any.
    pub color: Option<String>,
    /// Bytes of code in this language.
    pub size:  u64
}

/// Source of raw, paginated metrics for a subject.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MetricsClient: Send + Sync {
    /// Fetches the contribution calendar of the last year.
    async fn contribution_calendar(&self, login: &str) -> Result<ContributionCalendar, Error>;

    /// Fetches commit, pull request, issue and star totals in one request.
    async fn stats(&self, login: &str) -> Result<StatsFeed, Error>;

    /// Fetches one page of owned repositories with language sizes.
    async fn repository_languages(
        &self,
        login: &str,
        cursor: Option<String>
    ) -> Result<RepositoryPage, Error>;
}

const CALENDAR_QUERY: &str = r"
query($login: String!) {
  user(login: $login) {
    contributionsCollection {
      contributionCalendar {
        totalContributions
        weeks { contributionDays { date contributionCount } }
      }
    }
  }
}";

const STATS_QUERY: &str = r"
query($login: String!, $starCap: Int!) {
  user(login: $login) {
    contributionsCollection { totalCommitContributions }
    pullRequests(first: 1) { totalCount }
    openIssues: issues(states: OPEN) { totalCount }
    closedIssues: issues(states: CLOSED) { totalCount }
    repositoriesContributedTo(first: 1, contributionTypes: [COMMIT, ISSUE, PULL_REQUEST, REPOSITORY]) { totalCount }
    repositories(first: $starCap, ownerAffiliations: OWNER, orderBy: {direction: DESC, field: STARGAZERS}) {
      nodes { stargazers { totalCount } }
    }
  }
}";

const LANGUAGES_QUERY: &str = r"
query($login: String!, $first: Int!, $languages: Int!, $after: String) {
  user(login: $login) {
    repositories(ownerAffiliations: OWNER, isFork: false, first: $first, after: $after) {
      nodes {
        name
        isArchived
        languages(first: $languages, orderBy: {field: SIZE, direction: DESC}) {
          edges { size node { name color } }
        }
      }
      pageInfo { hasNextPage endCursor }
    }
  }
}";

/// GraphQL client for the GitHub API.
#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    retry:    RetryConfig
}

impl GitHubClient {
    /// Builds an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the token is blank and
    /// [`Error::Transport`] when the HTTP client cannot be initialized.
    pub fn new(token: &str) -> Result<Self, Error> {
        if token.trim().is_empty() {
            return Err(Error::configuration("GitHub token is required"));
        }

        let octocrab = Octocrab::builder()
            .personal_token(token.to_owned())
            .build()
            .map_err(|e| Error::transport(format!("failed to initialize GitHub client: {e}")))?;

        Ok(Self {
            octocrab,
            retry: RetryConfig::default()
        })
    }

    /// Replaces the retry policy applied to every request.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn query<T>(&self, operation: &str, query: &str, variables: Value) -> Result<T, Error>
    where
        T: DeserializeOwned
    {
        let payload = json!({ "query": query, "variables": variables });
        debug!(operation, "sending GraphQL request");

        let body: Value = retry_with_backoff(&self.retry, operation, || {
            let octocrab = self.octocrab.clone();
            let payload = payload.clone();
            async move {
                octocrab
                    .graphql::<Value>(&payload)
                    .await
                    .map_err(|e| AppError::service(format!("GraphQL request failed: {e}")))
            }
        })
        .await?;

        decode_envelope(operation, body)
    }
}

#[async_trait]
impl MetricsClient for GitHubClient {
    async fn contribution_calendar(&self, login: &str) -> Result<ContributionCalendar, Error> {
        let data: CalendarResponse = self
            .query("contribution calendar", CALENDAR_QUERY, json!({ "login": login }))
            .await?;
        let user = data.user.ok_or_else(|| missing_user(login))?;
        Ok(user.contributions_collection.contribution_calendar)
    }

    async fn stats(&self, login: &str) -> Result<StatsFeed, Error> {
        let data: StatsResponse = self
            .query(
                "stats totals",
                STATS_QUERY,
                json!({ "login": login, "starCap": STAR_REPOSITORY_CAP })
            )
            .await?;
        let user = data.user.ok_or_else(|| missing_user(login))?;

        Ok(StatsFeed {
            total_commits:       user.contributions_collection.total_commit_contributions,
            total_pull_requests: user.pull_requests.total_count,
            open_issues:         user.open_issues.total_count,
            closed_issues:       user.closed_issues.total_count,
            contributed_to:      user.repositories_contributed_to.total_count,
            repository_stars:    user
                .repositories
                .nodes
                .into_iter()
                .flatten()
                .map(|node| node.stargazers.total_count)
                .collect()
        })
    }

    async fn repository_languages(
        &self,
        login: &str,
        cursor: Option<String>
    ) -> Result<RepositoryPage, Error> {
        let variables = json!({
            "login": login,
            "first": LANGUAGE_PAGE_SIZE,
            "languages": LANGUAGES_PER_REPOSITORY,
            "after": cursor
        });
        let data: LanguagesResponse = self
            .query("repository languages", LANGUAGES_QUERY, variables)
            .await?;
        let user = data.user.ok_or_else(|| missing_user(login))?;
        Ok(user.repositories.into_page())
    }
}

fn decode_envelope<T>(operation: &str, body: Value) -> Result<T, Error>
where
    T: DeserializeOwned
{
    let envelope: Envelope<T> = serde_json::from_value(body).map_err(|e| {
        Error::malformed_feed(format!("{operation} response has an unexpected shape: {e}"))
    })?;

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        let messages = errors
            .into_iter()
            .map(|error| error.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::transport(format!("{operation} failed: {messages}")));
    }

    envelope
        .data
        .ok_or_else(|| Error::malformed_feed(format!("{operation} response contains no data")))
}

fn missing_user(login: &str) -> Error {
    Error::malformed_feed(format!("user '{login}' was not found"))
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data:   Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String
}

#[derive(Debug, Deserialize)]
struct TotalCount {
    #[serde(rename = "totalCount")]
    total_count: u64
}

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    user: Option<CalendarUser>
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarUser {
    contributions_collection: CalendarCollection
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarCollection {
    contribution_calendar: ContributionCalendar
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    user: Option<StatsUser>
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsUser {
    contributions_collection:    CommitCollection,
    pull_requests:               TotalCount,
    open_issues:                 TotalCount,
    closed_issues:               TotalCount,
    repositories_contributed_to: TotalCount,
    repositories:                StarNodes
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitCollection {
    total_commit_contributions: u64
}

#[derive(Debug, Deserialize)]
struct StarNodes {
    nodes: Option<Vec<StarNode>>
}

#[derive(Debug, Deserialize)]
struct StarNode {
    stargazers: TotalCount
}

#[derive(Debug, Deserialize)]
struct LanguagesResponse {
    user: Option<LanguagesUser>
}

#[derive(Debug, Deserialize)]
struct LanguagesUser {
    repositories: RepositoryConnection
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryConnection {
    nodes:     Option<Vec<RepositoryNode>>,
    page_info: PageInfo
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    name:        String,
    #[serde(default)]
    is_archived: bool,
    languages:   Option<LanguageConnection>
}

#[derive(Debug, Deserialize)]
struct LanguageConnection {
    edges: Option<Vec<LanguageEdgeNode>>
}

#[derive(Debug, Deserialize)]
struct LanguageEdgeNode {
    size: u64,
    node: LanguageNode
}

#[derive(Debug, Deserialize)]
struct LanguageNode {
    name:  String,
    color: Option<String>
}

impl RepositoryConnection {
    fn into_page(self) -> RepositoryPage {
        let repositories = self
            .nodes
            .into_iter()
            .flatten()
            .map(|node| RepositoryLanguages {
                name:        node.name,
                is_archived: node.is_archived,
                languages:   node
                    .languages
                    .and_then(|connection| connection.edges)
                    .into_iter()
                    .flatten()
                    .map(|edge| LanguageEdge {
                        name:  edge.node.name,
                        color: edge.node.color,
                        size:  edge.size
                    })
                    .collect()
            })
            .collect();

        RepositoryPage {
            repositories,
            page_info: self.page_info
        }
    }
}
