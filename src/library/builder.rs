// src/library/builder.rs
// =============================================================================
// Fills the README library.
//
// Every candidate repository goes through the same steps:
//
//   Candidate -> Fetching -> Fetched ------> Decoding -> Recorded
//                        \-> FetchFailed              \-> DecodeFailed
//
// Only Recorded touches the library. FetchFailed and DecodeFailed are logged
// with the repository name and the repository is simply left out; the next
// repository is processed as if nothing happened.
//
// Concurrency:
// With concurrency = 1 (the default) README requests go out one at a time
// in listing order. With a larger value up to N requests are in flight, but
// results still come back in listing order (buffered, not
// buffer_unordered) and only the loop below writes to the library.
// =============================================================================

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{DecodeError, GitHubError};
use crate::github::{fetch_readme, list_all_repositories, FetchOutcome, GitHubApi, RepositoryDescriptor};

use super::decode::decode_content;
use super::filter::filter_by_keyword;
use super::ReadmeLibrary;

/// Where a single repository ended up.
#[derive(Debug)]
pub enum RepoOutcome {
    /// README fetched and decoded
    Recorded(String),
    /// The README request failed
    FetchFailed(GitHubError),
    /// The README request succeeded but had no content
    FetchedNothing,
    /// The content could not be decoded
    DecodeFailed(DecodeError),
}

/// Fetches and decodes the README of one repository.
pub async fn process_repository<A>(
    api: &A,
    org: &str,
    repo: &str,
    git_ref: Option<&str>,
) -> RepoOutcome
where
    A: GitHubApi + ?Sized,
{
    let encoded = match fetch_readme(api, org, repo, git_ref).await {
        FetchOutcome::Found(encoded) => encoded,
        FetchOutcome::Empty => return RepoOutcome::FetchedNothing,
        FetchOutcome::Failed(e) => return RepoOutcome::FetchFailed(e),
    };

    match decode_content(&encoded) {
        Ok(text) => RepoOutcome::Recorded(text),
        Err(e) => RepoOutcome::DecodeFailed(e),
    }
}

/// Collects the READMEs of `repos` into a library, skipping failures.
pub async fn build_library<A>(
    api: &A,
    org: &str,
    repos: &[RepositoryDescriptor],
    git_ref: Option<&str>,
    concurrency: usize,
) -> ReadmeLibrary
where
    A: GitHubApi + ?Sized,
{
    let mut library = ReadmeLibrary::new();

    let mut outcomes = stream::iter(repos)
        .map(move |repo| async move {
            let outcome = process_repository(api, org, &repo.name, git_ref).await;
            (repo.name.as_str(), outcome)
        })
        .buffered(concurrency.max(1));

    while let Some((name, outcome)) = outcomes.next().await {
        match outcome {
            RepoOutcome::Recorded(readme) => {
                info!(repository = name, bytes = readme.len(), "found a README");
                library.insert(name.to_string(), readme);
            }
            RepoOutcome::FetchFailed(e) => {
                warn!(repository = name, error = %e, "README request failed, skipping");
            }
            RepoOutcome::FetchedNothing => {
                warn!(
                    repository = name,
                    "README request returned nothing, skipping. Are you sure it exists?"
                );
            }
            RepoOutcome::DecodeFailed(e) => {
                warn!(repository = name, error = %e, "README decoding failed, skipping");
            }
        }
    }

    library
}

/// Runs the whole pipeline for `config.org`.
///
/// Only a failure while listing repositories is returned as an error.
/// Per-repository problems show up as missing entries and log lines.
pub async fn harvest<A>(api: &A, config: &Config) -> Result<ReadmeLibrary, GitHubError>
where
    A: GitHubApi + ?Sized,
{
    let all_repos = list_all_repositories(api, &config.org, config.per_page).await?;
    let candidates = filter_by_keyword(all_repos, &config.keyword);
    info!(
        keyword = %config.keyword,
        candidates = candidates.len(),
        "filtered repositories by keyword"
    );

    let library = build_library(
        api,
        &config.org,
        &candidates,
        config.git_ref.as_deref(),
        config.concurrency,
    )
    .await;

    info!(
        collected = library.len(),
        skipped = candidates.len().saturating_sub(library.len()),
        "README library complete"
    );
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticToken;
    use crate::github::{EncodedContent, MockGitHubApi, RepositoryPage};
    use mockall::Sequence;
    use reqwest::StatusCode;
    use std::sync::Arc;

    fn config() -> Config {
        Config::new("intelsdi-x", Arc::new(StaticToken::new("secret"))).unwrap()
    }

    fn single_page(names: &[&str]) -> RepositoryPage {
        RepositoryPage {
            repositories: names.iter().map(|n| RepositoryDescriptor::named(*n)).collect(),
            next_page: None,
        }
    }

    fn base64_readme(encoded: &str) -> Result<Option<EncodedContent>, GitHubError> {
        Ok(Some(EncodedContent::new(encoded, "base64")))
    }

    fn server_error() -> GitHubError {
        GitHubError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            url: "https://api.github.com/repos/intelsdi-x/x/readme".to_string(),
            message: "Server Error".to_string(),
        }
    }

    #[tokio::test]
    async fn test_harvest_single_matching_repository() {
        let mut api = MockGitHubApi::new();
        api.expect_list_org_repos()
            .withf(|org, page, per_page| org == "intelsdi-x" && *page == 1 && *per_page == 10)
            .times(1)
            .returning(|_, _, _| Ok(single_page(&["tool-a", "snap-plugin-collector", "other"])));
        api.expect_get_readme()
            .withf(|owner, repo, _| owner == "intelsdi-x" && repo == "snap-plugin-collector")
            .times(1)
            .returning(|_, _, _| base64_readme("IFJlYWRtZQ=="));

        let library = harvest(&api, &config()).await.unwrap();

        assert_eq!(library.len(), 1);
        assert_eq!(library.get("snap-plugin-collector"), Some(" Readme"));
        assert!(!library.contains("tool-a"));
        assert!(!library.contains("other"));
    }

    #[tokio::test]
    async fn test_fetch_failure_does_not_stop_other_repositories() {
        let mut api = MockGitHubApi::new();
        api.expect_list_org_repos()
            .returning(|_, _, _| Ok(single_page(&["snap-plugin-broken", "snap-plugin-ok"])));
        api.expect_get_readme()
            .times(2)
            .returning(|_, repo, _| match repo {
                "snap-plugin-broken" => Err(server_error()),
                _ => base64_readme("IFJlYWRtZQ=="),
            });

        let library = harvest(&api, &config()).await.unwrap();

        assert_eq!(library.repositories(), vec!["snap-plugin-ok"]);
    }

    #[tokio::test]
    async fn test_missing_readme_is_absent() {
        let mut api = MockGitHubApi::new();
        api.expect_list_org_repos()
            .returning(|_, _, _| Ok(single_page(&["snap-plugin-none", "snap-plugin-empty"])));
        api.expect_get_readme().returning(|_, repo, _| match repo {
            "snap-plugin-none" => Err(GitHubError::NotFound(
                "https://api.github.com/repos/intelsdi-x/snap-plugin-none/readme".to_string(),
            )),
            _ => Ok(None),
        });

        let library = harvest(&api, &config()).await.unwrap();

        assert!(library.is_empty());
    }

    #[tokio::test]
    async fn test_decode_failure_is_absent_and_processing_continues() {
        let mut api = MockGitHubApi::new();
        api.expect_list_org_repos().returning(|_, _, _| {
            Ok(single_page(&["snap-plugin-huge", "snap-plugin-garbled", "snap-plugin-fine"]))
        });
        api.expect_get_readme()
            .times(3)
            .returning(|_, repo, _| match repo {
                "snap-plugin-huge" => Ok(Some(EncodedContent::new("x", "none"))),
                "snap-plugin-garbled" => base64_readme("%%%not base64%%%"),
                _ => base64_readme("IyBGaW5lCg=="),
            });

        let library = harvest(&api, &config()).await.unwrap();

        assert_eq!(library.repositories(), vec!["snap-plugin-fine"]);
        assert_eq!(library.get("snap-plugin-fine"), Some("# Fine\n"));
    }

    #[tokio::test]
    async fn test_listing_failure_is_returned() {
        let mut api = MockGitHubApi::new();
        api.expect_list_org_repos()
            .returning(|_, _, _| Err(GitHubError::Credential("bad credentials".to_string())));
        api.expect_get_readme().never();

        let result = harvest(&api, &config()).await;

        assert!(matches!(result, Err(GitHubError::Credential(_))));
    }

    #[tokio::test]
    async fn test_every_match_is_processed() {
        let mut api = MockGitHubApi::new();
        api.expect_list_org_repos().returning(|_, _, _| {
            Ok(single_page(&["snap-plugin-a", "unrelated", "snap-plugin-b", "snap-plugin-c"]))
        });
        api.expect_get_readme()
            .times(3)
            .returning(|_, _, _| base64_readme("IFJlYWRtZQ=="));

        let library = harvest(&api, &config()).await.unwrap();

        assert_eq!(
            library.repositories(),
            vec!["snap-plugin-a", "snap-plugin-b", "snap-plugin-c"]
        );
    }

    #[tokio::test]
    async fn test_repositories_are_fetched_in_listing_order() {
        let mut api = MockGitHubApi::new();
        let mut seq = Sequence::new();
        for name in ["snap-plugin-z", "snap-plugin-a", "snap-plugin-m"] {
            api.expect_get_readme()
                .withf(move |_, repo, _| repo == name)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _, _| base64_readme("IA=="));
        }

        let repos: Vec<_> = ["snap-plugin-z", "snap-plugin-a", "snap-plugin-m"]
            .into_iter()
            .map(RepositoryDescriptor::named)
            .collect();
        let library = build_library(&api, "intelsdi-x", &repos, None, 1).await;

        assert_eq!(library.len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_give_the_same_library() {
        let mut api = MockGitHubApi::new();
        api.expect_get_readme().returning(|_, repo, _| match repo {
            "snap-plugin-2" => Err(server_error()),
            _ => base64_readme("IFJlYWRtZQ=="),
        });

        let repos: Vec<_> = (1..=6)
            .map(|i| RepositoryDescriptor::named(format!("snap-plugin-{i}")))
            .collect();

        let sequential = build_library(&api, "intelsdi-x", &repos, None, 1).await;
        let concurrent = build_library(&api, "intelsdi-x", &repos, None, 4).await;

        assert_eq!(sequential, concurrent);
        assert_eq!(concurrent.len(), 5);
        assert!(!concurrent.contains("snap-plugin-2"));
    }

    #[tokio::test]
    async fn test_ref_reaches_the_api() {
        let mut api = MockGitHubApi::new();
        api.expect_list_org_repos()
            .returning(|_, _, _| Ok(single_page(&["snap-plugin-x"])));
        api.expect_get_readme()
            .withf(|_, _, git_ref| git_ref.as_deref() == Some("v1.0.0"))
            .times(1)
            .returning(|_, _, _| base64_readme("IA=="));

        let mut config = config();
        config.git_ref = Some("v1.0.0".to_string());
        let library = harvest(&api, &config).await.unwrap();

        assert_eq!(library.get("snap-plugin-x"), Some(" "));
    }
}
