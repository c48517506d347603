// src/config.rs
// =============================================================================
// Run configuration and the credential capability.
//
// Everything the pipeline needs to know is carried by one Config value that
// main() builds once from the command line and then lends to the GitHub
// client and the library builder. Nothing is read from globals.
//
// The access token is not stored as a bare string on Config. Instead the
// client asks a TokenSource for the "current credential" right before each
// request, so a refreshing source could be dropped in later without touching
// the client.
//
// Rust concepts:
// - Traits as capabilities: TokenSource only exposes token()
// - Arc<dyn Trait>: shared ownership of a trait object
// =============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use url::Url;

use crate::error::GitHubError;

/// Repository names must contain this to be collected.
pub const DEFAULT_KEYWORD: &str = "snap-plugin";

/// Repositories requested per listing page.
pub const DEFAULT_PER_PAGE: u8 = 10;

/// GitHub refuses page sizes above this.
pub const MAX_PER_PAGE: u8 = 100;

pub const DEFAULT_API_URL: &str = "https://api.github.com/";

/// Produces the credential used to authenticate API requests.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Result<String, GitHubError>;
}

/// A token that never changes, typically read from GITHUB_ACCESS_TOKEN.
pub struct StaticToken {
    access_token: String,
}

impl StaticToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Result<String, GitHubError> {
        if self.access_token.is_empty() {
            return Err(GitHubError::Credential("access token is empty".to_string()));
        }
        Ok(self.access_token.clone())
    }
}

// Never print the token itself
impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Settings for one harvesting run.
#[derive(Clone)]
pub struct Config {
    /// Organization whose repositories we enumerate
    pub org: String,
    /// Substring a repository name must contain
    pub keyword: String,
    /// Listing page size (1..=100)
    pub per_page: u8,
    /// Optional branch, tag or commit to read READMEs from
    pub git_ref: Option<String>,
    /// Base URL of the REST API, ending in '/'
    pub api_url: Url,
    /// How many README fetches may be in flight at once
    pub concurrency: usize,
    /// Per-request timeout
    pub timeout: Duration,
    pub token_source: Arc<dyn TokenSource>,
}

impl Config {
    /// Builds a config with defaults for everything but the organization
    /// and the credential.
    pub fn new(org: impl Into<String>, token_source: Arc<dyn TokenSource>) -> Result<Self> {
        Ok(Self {
            org: org.into(),
            keyword: DEFAULT_KEYWORD.to_string(),
            per_page: DEFAULT_PER_PAGE,
            git_ref: None,
            api_url: Url::parse(DEFAULT_API_URL)?,
            concurrency: 1,
            timeout: Duration::from_secs(30),
            token_source,
        })
    }

    /// Checks the values a run cannot start without.
    ///
    /// Called by main() before any request is made, so a missing token or
    /// organization is reported as a startup error.
    pub fn validate(&self) -> Result<()> {
        if self.org.trim().is_empty() {
            bail!("You need to set a single organization name in GH_ORG (or pass --org).");
        }
        if self.token_source.token().is_err() {
            bail!("Before you can use this you must set the GITHUB_ACCESS_TOKEN environment variable.");
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            bail!("--per-page must be between 1 and {}, got {}", MAX_PER_PAGE, self.per_page);
        }
        if self.concurrency == 0 {
            bail!("--concurrency must be at least 1");
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("org", &self.org)
            .field("keyword", &self.keyword)
            .field("per_page", &self.per_page)
            .field("git_ref", &self.git_ref)
            .field("api_url", &self.api_url.as_str())
            .field("concurrency", &self.concurrency)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
