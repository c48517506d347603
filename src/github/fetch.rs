// src/github/fetch.rs
// =============================================================================
// Fetches the README of a single repository.
//
// Strategy:
// - Ask GitHub's "get the README" endpoint, which picks README.md, README,
//   readme.rst, ... for us and answers with base64-encoded content
// - Sort the answer into one of three outcomes so the caller can log each
//   of them differently
//
// Nothing here is fatal: a repository without a README is a normal thing.
// =============================================================================

use tracing::debug;

use crate::error::GitHubError;

use super::api::GitHubApi;
use super::types::EncodedContent;

/// What a README request produced.
#[derive(Debug)]
pub enum FetchOutcome {
    /// GitHub sent content to decode
    Found(EncodedContent),
    /// The request worked but carried no content
    Empty,
    /// The request failed (no README, permissions, network, ...)
    Failed(GitHubError),
}

/// Requests the README of `owner/repo`, optionally at `git_ref`.
pub async fn fetch_readme<A>(api: &A, owner: &str, repo: &str, git_ref: Option<&str>) -> FetchOutcome
where
    A: GitHubApi + ?Sized,
{
    match api.get_readme(owner, repo, git_ref.map(str::to_string)).await {
        Ok(Some(content)) if !content.is_empty() => {
            debug!(
                repository = repo,
                path = content.path.as_deref().unwrap_or("README"),
                size = content.size,
                "README located"
            );
            FetchOutcome::Found(content)
        }
        Ok(_) => FetchOutcome::Empty,
        Err(e) => FetchOutcome::Failed(e),
    }
}
