// src/error.rs
// =============================================================================
// Error types shared by the GitHub client and the README pipeline.
//
// Two families of errors exist, and the pipeline treats them differently:
// - GitHubError: anything that goes wrong talking to the API. While listing
//   repositories this stops the whole run; while fetching one README it only
//   skips that repository.
// - DecodeError: the README arrived but we could not turn it into text.
//   Always a per-repository skip.
//
// Rust concepts:
// - thiserror: derive macro that writes the Display and Error impls for us
// - #[from]: automatic conversion so the ? operator can wrap source errors
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the GitHub API layer.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The resource does not exist (or the token cannot see it).
    #[error("not found: {0}")]
    NotFound(String),

    /// GitHub answered with a non-success status other than 404.
    #[error("GitHub returned HTTP {status} for {url}: {message}")]
    Status {
        status: StatusCode,
        url: String,
        message: String,
    },

    /// The response body was not the JSON we expected.
    #[error("unexpected response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The Link header sent us somewhere that would never finish.
    #[error("pagination did not advance: page {current} pointed to page {next}")]
    Pagination { current: u32, next: u32 },

    /// The credential source could not produce a token.
    #[error("no GitHub credential available: {0}")]
    Credential(String),

    /// An endpoint URL could not be built from the configured base.
    #[error("invalid GitHub URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors produced while decoding README content.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported content encoding '{0}'")]
    Unsupported(String),

    #[error("content is missing")]
    MissingContent,

    #[error("malformed base64 content: {0}")]
    Malformed(#[from] base64::DecodeError),

    #[error("decoded content is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}
