// src/library/filter.rs
// Keeps the repositories whose name contains the keyword.
//
// Matching is a plain, case-sensitive substring test. Order is preserved and
// an empty keyword keeps everything.

use crate::github::RepositoryDescriptor;

/// True if `name` contains `keyword` as a contiguous substring.
pub fn matches_keyword(name: &str, keyword: &str) -> bool {
    name.contains(keyword)
}

/// Returns the repositories whose name contains `keyword`, in input order.
pub fn filter_by_keyword(
    repos: Vec<RepositoryDescriptor>,
    keyword: &str,
) -> Vec<RepositoryDescriptor> {
    repos
        .into_iter()
        .filter(|repo| matches_keyword(&repo.name, keyword))
        .collect()
}
