// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to GitHub.
//
// Currently implements:
// - An authenticated client for the GitHub REST API (api.rs)
// - Paginated listing of an organization's repositories (list.rs)
// - Fetching a repository's README (fetch.rs)
//
// The pipeline only ever sees the GitHubApi trait, never reqwest directly.
// =============================================================================

mod api;
mod fetch;
mod list;
mod types;

pub use api::{GitHubApi, GitHubClient};
pub use fetch::{fetch_readme, FetchOutcome};
pub use list::list_all_repositories;
pub use types::{EncodedContent, RepositoryDescriptor};

#[cfg(test)]
pub use api::MockGitHubApi;
#[cfg(test)]
pub use types::RepositoryPage;
