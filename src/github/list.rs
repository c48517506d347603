// src/github/list.rs
// =============================================================================
// Lists every repository of an organization, following pagination.
//
// The loop:
// 1. Request page 1
// 2. Append what came back
// 3. If GitHub says there is a next page, request it and go to 2
// 4. Otherwise we are done
//
// Any error on any page fails the whole listing, and no partial list is ever
// returned. There is no retry.
// =============================================================================

use tracing::{debug, info};

use crate::error::GitHubError;

use super::api::GitHubApi;
use super::types::RepositoryDescriptor;

/// Returns all repositories of `org`, in the order GitHub listed them.
pub async fn list_all_repositories<A>(
    api: &A,
    org: &str,
    per_page: u8,
) -> Result<Vec<RepositoryDescriptor>, GitHubError>
where
    A: GitHubApi + ?Sized,
{
    let mut all_repos = Vec::new();
    let mut page = 1;

    loop {
        let response = api.list_org_repos(org, page, per_page).await?;
        debug!(
            org,
            page,
            count = response.repositories.len(),
            "received repository page"
        );
        all_repos.extend(response.repositories);

        match response.next_page {
            None => break,
            // A cursor that doesn't move forward would loop forever
            Some(next) if next <= page => {
                return Err(GitHubError::Pagination {
                    current: page,
                    next,
                });
            }
            Some(next) => page = next,
        }
    }

    info!(org, total = all_repos.len(), "listed organization repositories");
    Ok(all_repos)
}
