// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::{
    client::{MetricsClient, RepositoryLanguages},
    error::Error,
    model::{Language, LanguagesData}
};

/// Hard bound on repositories visited while paginating.
pub const REPOSITORY_CAP: usize = 200;

#[derive(Debug, Clone)]
struct LanguageSlot {
    name:  String,
    color: Option<String>,
    size:  u64
}

/// Merges language sizes across repositories.
///
/// Languages keep the order in which they were first seen so that equal
/// sizes sort deterministically. The first non-empty color reported for a
/// language is kept; later colors for the same name are ignored.
#[derive(Debug, Clone, Default)]
pub struct LanguageAccumulator {
    slots:      Vec<LanguageSlot>,
    index:      HashMap<String, usize>,
    total_size: u64,
    processed:  usize
}

impl LanguageAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Repositories visited so far, archived ones included.
    pub fn processed_repositories(&self) -> usize {
        self.processed
    }

    /// Adds the language sizes of one repository.
    ///
    /// Archived repositories count as processed but contribute nothing, as
    /// do edges with a zero size.
    pub fn absorb(&mut self, repository: &RepositoryLanguages) {
        self.processed += 1;
        if repository.is_archived {
            debug!(repository = %repository.name, "skipping archived repository");
            return;
        }

        for edge in repository.languages.iter().filter(|edge| edge.size > 0) {
            self.total_size = self.total_size.saturating_add(edge.size);
            let color = edge.color.as_ref().filter(|color| !color.is_empty());

            match self.index.get(&edge.name) {
                Some(&position) => {
                    let slot = &mut self.slots[position];
                    slot.size = slot.size.saturating_add(edge.size);
                    if slot.color.is_none() {
                        slot.color = color.cloned();
                    }
                }
                None => {
                    self.index.insert(edge.name.clone(), self.slots.len());
                    self.slots.push(LanguageSlot {
                        name:  edge.name.clone(),
                        color: color.cloned(),
                        size:  edge.size
                    });
                }
            }
        }
    }

    /// Produces the breakdown sorted by size descending.
    ///
    /// When nothing was accumulated every percentage is `0.0`.
    pub fn finish(self) -> LanguagesData {
        let total_size = self.total_size;
        let mut slots = self.slots;
        slots.sort_by(|left, right| right.size.cmp(&left.size));

        let languages = slots
            .into_iter()
            .map(|slot| Language {
                percentage: percentage(slot.size, total_size),
                name:       slot.name,
                color:      slot.color.unwrap_or_default(),
                size:       slot.size
            })
            .collect();

        LanguagesData {
            languages,
            total_size
        }
    }
}

fn percentage(size: u64, total_size: u64) -> f64 {
    if total_size == 0 {
        0.0
    } else {
        size as f64 / total_size as f64 * 100.0
    }
}

/// Paginates through the owned repositories of `login` and merges their
/// languages.
///
/// Pagination stops when the provider reports no further page, when the
/// page carries no usable cursor, when the cursor repeats the previous one,
/// or once `repository_cap` repositories have been visited. None of these
/// is an error. Any failed page aborts the whole aggregation so a partial
/// breakdown is never returned.
///
/// # Errors
///
/// Propagates the first error returned by the metrics client.
pub async fn collect_languages<C>(
    client: &C,
    login: &str,
    repository_cap: usize
) -> Result<LanguagesData, Error>
where
    C: MetricsClient + ?Sized
{
    let mut accumulator = LanguageAccumulator::new();
    let mut cursor: Option<String> = None;
    let mut seen_cursors: HashSet<String> = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = client.repository_languages(login, cursor.clone()).await?;
        pages += 1;

        for repository in &page.repositories {
            if accumulator.processed_repositories() >= repository_cap {
                break;
            }
            accumulator.absorb(repository);
        }

        debug!(
            page = pages,
            repositories = page.repositories.len(),
            processed = accumulator.processed_repositories(),
            "merged language page"
        );

        if accumulator.processed_repositories() >= repository_cap {
            info!(cap = repository_cap, "repository cap reached, stopping pagination");
            break;
        }

        if !page.page_info.has_next_page {
            break;
        }

        // An empty page cannot advance toward the cap.
        if page.repositories.is_empty() {
            warn!(
                page = pages,
                "provider returned an empty page with more pages pending, stopping pagination"
            );
            break;
        }

        let Some(next) = page.page_info.end_cursor.filter(|next| !next.is_empty()) else {
            debug!("page has no usable cursor, stopping pagination");
            break;
        };

        if !seen_cursors.insert(next.clone()) {
            warn!(cursor = %next, "provider repeated a cursor, stopping pagination");
            break;
        }

        cursor = Some(next);
    }

    info!(
        pages,
        repositories = accumulator.processed_repositories(),
        "language aggregation finished"
    );

    Ok(accumulator.finish())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;
    use crate::client::{LanguageEdge, MockMetricsClient, PageInfo, RepositoryPage};

    fn edge(name: &str, color: Option<&str>, size: u64) -> LanguageEdge {
        LanguageEdge {
            name: name.to_owned(),
            color: color.map(str::to_owned),
            size
        }
    }

    fn repository(name: &str, languages: Vec<LanguageEdge>) -> RepositoryLanguages {
        RepositoryLanguages {
            name: name.to_owned(),
            is_archived: false,
            languages
        }
    }

    fn page(
        repositories: Vec<RepositoryLanguages>,
        has_next_page: bool,
        end_cursor: Option<&str>
    ) -> RepositoryPage {
        RepositoryPage {
            repositories,
            page_info: PageInfo {
                has_next_page,
                end_cursor: end_cursor.map(str::to_owned)
            }
        }
    }

    fn filler(count: usize) -> Vec<RepositoryLanguages> {
        (0..count)
            .map(|position| repository(&format!("repo-{position}"), vec![edge("Rust", None, 1)]))
            .collect()
    }

    #[test]
    fn merges_sizes_and_sorts_descending() {
        let mut accumulator = LanguageAccumulator::new();
        accumulator.absorb(&repository("a", vec![
            edge("Rust", Some("#dea584"), 300),
            edge("Shell", Some("#89e051"), 50),
        ]));
        accumulator.absorb(&repository("b", vec![
            edge("TypeScript", Some("#3178c6"), 200),
            edge("Rust", Some("#000000"), 100),
        ]));

        let data = accumulator.finish();
        assert_eq!(data.total_size, 650);

        let names: Vec<&str> = data.languages.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Rust", "TypeScript", "Shell"]);
        assert_eq!(data.languages[0].size, 400);
        assert_eq!(data.languages[0].color, "#dea584");

        let sum: f64 = data.languages.iter().map(|l| l.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn archived_repositories_and_empty_edges_are_skipped() {
        let mut accumulator = LanguageAccumulator::new();
        let mut archived = repository("old", vec![edge("Perl", Some("#0298c3"), 900)]);
        archived.is_archived = true;
        accumulator.absorb(&archived);
        accumulator.absorb(&repository("new", vec![edge("Go", None, 0), edge("C", None, 10)]));

        assert_eq!(accumulator.processed_repositories(), 2);
        let data = accumulator.finish();
        assert_eq!(data.total_size, 10);
        assert_eq!(data.languages.len(), 1);
        assert_eq!(data.languages[0].name, "C");
        assert_eq!(data.languages[0].color, "");
    }

    #[test]
    fn equal_sizes_keep_first_seen_order() {
        let mut accumulator = LanguageAccumulator::new();
        accumulator.absorb(&repository("a", vec![edge("Zig", None, 5), edge("Ada", None, 5)]));

        let data = accumulator.finish();
        assert_eq!(data.languages[0].name, "Zig");
        assert_eq!(data.languages[1].name, "Ada");
    }

    #[test]
    fn later_color_fills_a_missing_one() {
        let mut accumulator = LanguageAccumulator::new();
        accumulator.absorb(&repository("a", vec![edge("Nix", None, 5)]));
        accumulator.absorb(&repository("b", vec![edge("Nix", Some("#7e7eff"), 5)]));

        assert_eq!(accumulator.finish().languages[0].color, "#7e7eff");
    }

    #[test]
    fn empty_input_yields_zero_total_without_fault() {
        let data = LanguageAccumulator::new().finish();
        assert_eq!(data.total_size, 0);
        assert!(data.languages.is_empty());
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[tokio::test]
    async fn follows_cursors_until_last_page() {
        let mut client = MockMetricsClient::new();
        client
            .expect_repository_languages()
            .withf(|login, cursor| login == "octocat" && cursor.is_none())
            .times(1)
            .returning(|_, _| {
                Ok(page(vec![repository("a", vec![edge("Rust", None, 10)])], true, Some("c1")))
            });
        client
            .expect_repository_languages()
            .withf(|_, cursor| cursor.as_deref() == Some("c1"))
            .times(1)
            .returning(|_, _| {
                Ok(page(vec![repository("b", vec![edge("Go", None, 30)])], false, Some("c2")))
            });

        let data = collect_languages(&client, "octocat", REPOSITORY_CAP)
            .await
            .expect("aggregation should succeed");

        assert_eq!(data.total_size, 40);
        assert_eq!(data.languages[0].name, "Go");
        assert_eq!(data.languages[0].percentage, 75.0);
    }

    #[tokio::test]
    async fn missing_cursor_terminates_pagination() {
        let mut client = MockMetricsClient::new();
        client
            .expect_repository_languages()
            .times(1)
            .returning(|_, _| Ok(page(filler(3), true, Some(""))));

        let data = collect_languages(&client, "octocat", REPOSITORY_CAP)
            .await
            .expect("aggregation should succeed");
        assert_eq!(data.total_size, 3);
    }

    #[tokio::test]
    async fn repeated_cursor_terminates_pagination() {
        let mut client = MockMetricsClient::new();
        client
            .expect_repository_languages()
            .times(2)
            .returning(|_, _| Ok(page(filler(1), true, Some("same"))));

        let data = collect_languages(&client, "octocat", REPOSITORY_CAP)
            .await
            .expect("aggregation should succeed");
        assert_eq!(data.total_size, 2);
    }

    #[tokio::test]
    async fn cursor_cycle_terminates_pagination() {
        let mut client = MockMetricsClient::new();
        client
            .expect_repository_languages()
            .times(3)
            .returning(|_, cursor| {
                let next = if cursor.as_deref() == Some("a") { "b" } else { "a" };
                Ok(page(filler(1), true, Some(next)))
            });

        let data = collect_languages(&client, "octocat", REPOSITORY_CAP)
            .await
            .expect("aggregation should succeed");
        assert_eq!(data.total_size, 3);
    }

    #[tokio::test]
    async fn empty_pages_with_fresh_cursors_terminate() {
        let mut client = MockMetricsClient::new();
        let mut served = 0u32;
        client
            .expect_repository_languages()
            .times(1)
            .returning(move |_, _| {
                served += 1;
                Ok(page(Vec::new(), true, Some(&format!("cursor-{served}"))))
            });

        let data = collect_languages(&client, "octocat", REPOSITORY_CAP)
            .await
            .expect("aggregation should succeed");
        assert!(data.languages.is_empty());
        assert_eq!(data.total_size, 0);
    }

    #[tokio::test]
    async fn repository_cap_bounds_an_endless_feed() {
        let mut client = MockMetricsClient::new();
        let mut served = 0u32;
        client
            .expect_repository_languages()
            .times(2)
            .returning(move |_, _| {
                served += 1;
                Ok(page(filler(150), true, Some(&format!("cursor-{served}"))))
            });

        let data = collect_languages(&client, "octocat", REPOSITORY_CAP)
            .await
            .expect("aggregation should succeed");
        assert_eq!(data.total_size, REPOSITORY_CAP as u64);
    }

    #[tokio::test]
    async fn failed_page_discards_partial_aggregate() {
        let mut client = MockMetricsClient::new();
        client
            .expect_repository_languages()
            .withf(|_, cursor| cursor.is_none())
            .returning(|_, _| Ok(page(filler(2), true, Some("next"))));
        client
            .expect_repository_languages()
            .withf(|_, cursor| cursor.is_some())
            .returning(|_, _| Err(Error::transport("timeout")));

        let error = collect_languages(&client, "octocat", REPOSITORY_CAP)
            .await
            .expect_err("second page failure must abort");
        assert!(matches!(error, Error::Transport { .. }));
    }

    fn arbitrary_repository() -> impl Strategy<Value = RepositoryLanguages> {
        prop::collection::vec(
            (prop::sample::select(vec!["Rust", "Go", "C", "Lua"]), 0u64..1000),
            0..4
        )
        .prop_map(|edges| {
            repository(
                "generated",
                edges
                    .into_iter()
                    .map(|(name, size)| edge(name, None, size))
                    .collect()
            )
        })
    }

    fn sizes(data: &LanguagesData) -> BTreeMap<String, (u64, u64)> {
        data.languages
            .iter()
            .map(|l| (l.name.clone(), (l.size, (l.percentage * 1e6).round() as u64)))
            .collect()
    }

    proptest! {
        #[test]
        fn size_totals_do_not_depend_on_merge_order(
            repositories in prop::collection::vec(arbitrary_repository(), 0..12)
        ) {
            let mut forward = LanguageAccumulator::new();
            repositories.iter().for_each(|r| forward.absorb(r));
            let mut backward = LanguageAccumulator::new();
            repositories.iter().rev().for_each(|r| backward.absorb(r));

            let forward = forward.finish();
            let backward = backward.finish();
            prop_assert_eq!(forward.total_size, backward.total_size);
            prop_assert_eq!(sizes(&forward), sizes(&backward));
        }
    }
}
