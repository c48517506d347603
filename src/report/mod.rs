// src/report/mod.rs
// =============================================================================
// This module is the consumer of the README library.
//
// It only ever borrows the library and turns each README into a small
// summary (title, size, links) that main() prints as a table or as JSON.
// =============================================================================

mod markdown;

use serde::Serialize;

use crate::library::ReadmeLibrary;

use markdown::{extract_markdown_links, first_heading};

/// What we learned from one README.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadmeSummary {
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub bytes: usize,
    pub lines: usize,
    pub links: Vec<String>,
}

impl ReadmeSummary {
    pub fn new(repository: &str, readme: &str) -> Self {
        Self {
            repository: repository.to_string(),
            title: first_heading(readme),
            bytes: readme.len(),
            lines: readme.lines().count(),
            links: extract_markdown_links(readme),
        }
    }
}

/// Summarises every README in the library, sorted by repository name so
/// the output is stable between runs.
pub fn summarise(library: &ReadmeLibrary) -> Vec<ReadmeSummary> {
    let mut summaries: Vec<ReadmeSummary> = library
        .iter()
        .map(|(repository, readme)| ReadmeSummary::new(repository, readme))
        .collect();
    summaries.sort_by(|a, b| a.repository.cmp(&b.repository));
    summaries
}
