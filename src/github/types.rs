// src/github/types.rs
// =============================================================================
// Plain data types for the two GitHub endpoints we use.
//
// serde ignores every JSON field we don't name here, so these structs only
// carry what the pipeline actually reads.
// =============================================================================

use serde::{Deserialize, Serialize};

/// One entry of `GET /orgs/{org}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Repository name, unique within the organization
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

#[cfg(test)]
impl RepositoryDescriptor {
    /// A descriptor carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: None,
            default_branch: None,
            archived: false,
        }
    }
}

/// One page of a repository listing.
#[derive(Debug, Clone, Default)]
pub struct RepositoryPage {
    pub repositories: Vec<RepositoryDescriptor>,
    /// Page number to request next; None once the listing is exhausted
    pub next_page: Option<u32>,
}

/// The body of `GET /repos/{owner}/{repo}/readme`.
///
/// `content` is usually base64 text wrapped at 60 columns. It is None when
/// GitHub omits it (for instance for files too large to inline).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EncodedContent {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl EncodedContent {
    /// Builds a content handle the way GitHub would send it.
    #[cfg(test)]
    pub fn new(content: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            encoding: Some(encoding.into()),
            ..Self::default()
        }
    }

    /// True when there is nothing to decode.
    pub fn is_empty(&self) -> bool {
        self.content
            .as_deref()
            .map_or(true, |content| content.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_ignores_unknown_fields() {
        let json = r#"{
            "id": 42,
            "name": "snap-plugin-collector-cpu",
            "full_name": "intelsdi-x/snap-plugin-collector-cpu",
            "private": false,
            "default_branch": "master"
        }"#;
        let repo: RepositoryDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "snap-plugin-collector-cpu");
        assert_eq!(repo.default_branch.as_deref(), Some("master"));
        assert!(!repo.archived);
    }

    #[test]
    fn test_readme_body() {
        let json = r#"{
            "type": "file",
            "encoding": "base64",
            "size": 7,
            "name": "README.md",
            "path": "README.md",
            "content": "IFJlYWRtZQ==\n"
        }"#;
        let content: EncodedContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.encoding.as_deref(), Some("base64"));
        assert_eq!(content.path.as_deref(), Some("README.md"));
        assert_eq!(content.size, Some(7));
        assert!(!content.is_empty());
    }

    #[test]
    fn test_is_empty() {
        assert!(EncodedContent::default().is_empty());
        assert!(EncodedContent::new("\n", "base64").is_empty());
        assert!(!EncodedContent::new("IA==", "base64").is_empty());
    }
}
