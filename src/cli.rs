// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The two values every run needs, the organization and the access token,
// can come from flags or from the environment (GH_ORG and
// GITHUB_ACCESS_TOKEN). Everything else has a default.
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates the parsing code
// - Option<T>: an argument that may be absent
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use url::Url;

use crate::config::{Config, StaticToken, DEFAULT_API_URL, DEFAULT_KEYWORD, DEFAULT_PER_PAGE};

#[derive(Parser, Debug)]
#[command(
    name = "readme-harvester",
    version,
    about = "Collect the READMEs of a GitHub organization's repositories",
    long_about = "readme-harvester lists every repository of a GitHub organization, keeps the ones \
                  whose name contains a keyword, and downloads and decodes their READMEs."
)]
pub struct Cli {
    /// GitHub organization to scan
    #[arg(long, env = "GH_ORG")]
    pub org: Option<String>,

    /// Personal access token used to authenticate with GitHub
    #[arg(long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Only repositories whose name contains this text are collected
    #[arg(long, default_value = DEFAULT_KEYWORD)]
    pub keyword: String,

    /// Repositories requested per listing page (1-100)
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u8,

    /// Branch, tag or commit to read READMEs from (default branch if unset)
    #[arg(long = "ref")]
    pub git_ref: Option<String>,

    /// Base URL of the GitHub REST API (set this for GitHub Enterprise)
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// Number of READMEs fetched at the same time
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Turns the parsed arguments into a run configuration.
    ///
    /// Missing values are not rejected here; Config::validate() does that
    /// with a message that names the environment variable.
    pub fn into_config(self) -> Result<Config> {
        let token = StaticToken::new(self.token.unwrap_or_default());
        let mut config = Config::new(self.org.unwrap_or_default(), Arc::new(token))?;

        config.keyword = self.keyword;
        config.per_page = self.per_page;
        config.git_ref = self.git_ref.filter(|r| !r.is_empty());
        config.api_url = with_trailing_slash(self.api_url);
        config.concurrency = self.concurrency;
        config.timeout = Duration::from_secs(self.timeout_secs);

        Ok(config)
    }
}

// "https://ghe.example.com/api/v3" must keep its last segment when joined
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_build_config() {
        let cli = Cli::try_parse_from([
            "readme-harvester",
            "--org",
            "intelsdi-x",
            "--token",
            "secret",
            "--keyword",
            "collector",
            "--per-page",
            "50",
            "--ref",
            "master",
            "--concurrency",
            "4",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.org, "intelsdi-x");
        assert_eq!(config.keyword, "collector");
        assert_eq!(config.per_page, 50);
        assert_eq!(config.git_ref.as_deref(), Some("master"));
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.token_source.token().unwrap(), "secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["readme-harvester", "--org", "o", "--token", "t"]).unwrap();
        assert_eq!(cli.keyword, "snap-plugin");
        assert_eq!(cli.per_page, 10);
        assert_eq!(cli.concurrency, 1);
        assert!(!cli.json);
    }

    #[test]
    fn test_enterprise_url_gets_trailing_slash() {
        let url = with_trailing_slash(Url::parse("https://ghe.example.com/api/v3").unwrap());
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/");

        let url = with_trailing_slash(Url::parse("https://api.github.com").unwrap());
        assert_eq!(url.as_str(), "https://api.github.com/");
    }

    #[test]
    fn test_invalid_per_page_is_rejected_by_clap() {
        let result = Cli::try_parse_from(["readme-harvester", "--per-page", "1000"]);
        assert!(result.is_err());
    }
}
