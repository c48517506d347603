// src/github/api.rs
// =============================================================================
// The GitHub REST API, as far as this tool needs it.
//
// GitHubApi is the seam between the pipeline and the network. It has exactly
// two operations:
// - list one page of an organization's repositories
// - get the README of one repository
//
// GitHubClient implements it on top of reqwest. Tests implement it with a
// mockall mock, so the pipeline can be exercised without a network.
//
// Pagination:
// GitHub tells us about further pages through the Link response header:
//   Link: <https://api.github.com/organizations/1/repos?page=2>; rel="next",
//         <https://api.github.com/organizations/1/repos?page=5>; rel="last"
// The `page` parameter of the rel="next" URL becomes our next page cursor.
// No rel="next" entry means we just read the last page.
//
// Rust concepts:
// - async-trait: async methods on traits (trait objects need boxed futures)
// - cfg_attr(test, ...): only generate the mock when compiling tests
// =============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::{Config, TokenSource};
use crate::error::GitHubError;

use super::types::{EncodedContent, RepositoryDescriptor, RepositoryPage};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Operations the pipeline performs against the hosted Git service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Fetches page `page` (1-based) of the repositories owned by `org`.
    async fn list_org_repos(
        &self,
        org: &str,
        page: u32,
        per_page: u8,
    ) -> Result<RepositoryPage, GitHubError>;

    /// Fetches the README of `owner/repo`, optionally at a branch, tag or
    /// commit.
    ///
    /// Returns `Ok(None)` when GitHub answers successfully without a body.
    async fn get_readme(
        &self,
        owner: &str,
        repo: &str,
        git_ref: Option<String>,
    ) -> Result<Option<EncodedContent>, GitHubError>;
}

/// Error payload GitHub attaches to failed requests.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Authenticated client for api.github.com (or a GitHub Enterprise base URL).
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: Url,
    token_source: Arc<dyn TokenSource>,
}

impl GitHubClient {
    /// Creates a client from the run configuration.
    ///
    /// The reqwest client is built once and reused for every request
    /// (connection pooling).
    pub fn new(config: &Config) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            token_source: Arc::clone(&config.token_source),
        })
    }

    /// Builds `{api}/orgs/{org}/repos?per_page=..&page=..`.
    fn org_repos_url(&self, org: &str, page: u32, per_page: u8) -> Result<Url, GitHubError> {
        let mut url = endpoint(&self.api_url, &["orgs", org, "repos"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Builds `{api}/repos/{owner}/{repo}/readme[?ref=..]`.
    fn readme_url(&self, owner: &str, repo: &str, git_ref: Option<&str>) -> Result<Url, GitHubError> {
        let mut url = endpoint(&self.api_url, &["repos", owner, repo, "readme"])?;
        if let Some(git_ref) = git_ref.filter(|r| !r.is_empty()) {
            url.query_pairs_mut().append_pair("ref", git_ref);
        }
        Ok(url)
    }

    /// Sends an authenticated GET and turns non-success statuses into errors.
    async fn get(&self, url: &Url) -> Result<reqwest::Response, GitHubError> {
        let token = self.token_source.token()?;

        let response = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // The body is only used for the error message, so a failure to read
        // it must not hide the status code.
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, url, &body))
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn list_org_repos(
        &self,
        org: &str,
        page: u32,
        per_page: u8,
    ) -> Result<RepositoryPage, GitHubError> {
        let url = self.org_repos_url(org, page, per_page)?;
        debug!(%url, page, "requesting repository page");

        let response = self.get(&url).await?;
        let next_page = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_next_page);

        let body = response.text().await?;
        let repositories: Vec<RepositoryDescriptor> =
            serde_json::from_str(&body).map_err(|source| GitHubError::Body {
                url: url.to_string(),
                source,
            })?;

        Ok(RepositoryPage {
            repositories,
            next_page,
        })
    }

    async fn get_readme(
        &self,
        owner: &str,
        repo: &str,
        git_ref: Option<String>,
    ) -> Result<Option<EncodedContent>, GitHubError> {
        let url = self.readme_url(owner, repo, git_ref.as_deref())?;
        debug!(%url, "requesting README");

        let body = self.get(&url).await?.text().await?;
        parse_readme_body(&url, &body)
    }
}

/// Appends path segments to the API base URL.
///
/// Segments are percent-encoded by the url crate, so odd repository names
/// can't escape the intended path.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, GitHubError> {
    let mut target = base.clone();
    target
        .path_segments_mut()
        .map_err(|_| GitHubError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(target)
}

/// Maps a non-success response to a GitHubError.
fn status_error(status: StatusCode, url: &Url, body: &str) -> GitHubError {
    if status == StatusCode::NOT_FOUND {
        return GitHubError::NotFound(url.to_string());
    }

    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.trim().chars().take(200).collect());

    GitHubError::Status {
        status,
        url: url.to_string(),
        message,
    }
}

/// Parses a README response body. An empty or `null` body means GitHub had
/// nothing to give us.
fn parse_readme_body(url: &Url, body: &str) -> Result<Option<EncodedContent>, GitHubError> {
    let body = body.trim();
    if body.is_empty() || body == "null" {
        return Ok(None);
    }

    serde_json::from_str(body).map_err(|source| GitHubError::Body {
        url: url.to_string(),
        source,
    })
}

/// Extracts the page number of the rel="next" entry of a Link header.
///
/// Returns None when there is no next page. A page number of 0 is treated
/// the same way.
pub(crate) fn parse_next_page(link_header: &str) -> Option<u32> {
    link_header
        .split(',')
        .find_map(|entry| {
            let mut parts = entry.split(';');
            let target = parts
                .next()?
                .trim()
                .strip_prefix('<')?
                .strip_suffix('>')?;

            if !parts.any(|param| param.trim() == r#"rel="next""#) {
                return None;
            }

            let url = Url::parse(target).ok()?;
            url.query_pairs()
                .find(|(key, _)| *key == "page")
                .and_then(|(_, value)| value.parse::<u32>().ok())
        })
        .filter(|page| *page != 0)
}
