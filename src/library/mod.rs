// src/library/mod.rs
// =============================================================================
// This module builds the README library: repository name -> README text.
//
// Submodules:
// - filter: picks the repositories whose name contains the keyword
// - decode: turns GitHub's encoded payload into text
// - builder: runs list -> filter -> fetch -> decode and fills the library
//
// A repository only ends up in the library if both fetching and decoding
// worked. Failed repositories are left out entirely, never stored with an
// empty string.
// =============================================================================

mod builder;
mod decode;
mod filter;

use std::collections::HashMap;

use serde::Serialize;

pub use builder::harvest;

/// Decoded README text keyed by repository name.
///
/// Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReadmeLibrary {
    readmes: HashMap<String, String>,
}

impl ReadmeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the README of `repository`, replacing an earlier one.
    pub(crate) fn insert(&mut self, repository: String, readme: String) {
        self.readmes.insert(repository, readme);
    }

    #[cfg(test)]
    pub fn get(&self, repository: &str) -> Option<&str> {
        self.readmes.get(repository).map(String::as_str)
    }

    #[cfg(test)]
    pub fn contains(&self, repository: &str) -> bool {
        self.readmes.contains_key(repository)
    }

    pub fn len(&self) -> usize {
        self.readmes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readmes.is_empty()
    }

    /// (repository, README) pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.readmes
            .iter()
            .map(|(name, readme)| (name.as_str(), readme.as_str()))
    }

    /// Repository names, sorted.
    pub fn repositories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.readmes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
