// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Load a .env file (if any) and set up logging
// 2. Parse command-line arguments into a Config and check it
// 3. Harvest the README library from GitHub
// 4. Summarise the library and print it
// 5. Exit with proper code (0 = success, 2 = error)
//
// Logs go to stderr, the report goes to stdout, so
// `readme-harvester --json > readmes.json` captures only the report.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - run configuration and credentials
mod error; // src/error.rs - error types
mod github; // src/github/ - GitHub API access
mod library; // src/library/ - building the README library
mod report; // src/report/ - summarising the collected READMEs

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use github::GitHubClient;

#[tokio::main]
async fn main() {
    // Environment variables may live in a .env file during development
    dotenvy::dotenv().ok();
    init_tracing();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %format!("{e:#}"), "readme-harvester failed");
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG controls verbosity, e.g. RUST_LOG=readme_harvester=debug
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let json = cli.json;

    let config = cli.into_config()?;
    config.validate()?;
    info!(
        org = %config.org,
        keyword = %config.keyword,
        per_page = config.per_page,
        "harvesting READMEs"
    );

    let client = GitHubClient::new(&config).context("failed to build the GitHub client")?;
    let library = library::harvest(&client, &config)
        .await
        .with_context(|| format!("failed to list the repositories of '{}'", config.org))?;

    if library.is_empty() {
        println!(
            "⚠️  No READMEs collected for repositories matching '{}'",
            config.keyword
        );
        return Ok(());
    }

    info!(repositories = ?library.repositories(), "collected READMEs");
    let summaries = report::summarise(&library);
    print_results(&summaries, json)
}

// Prints the results either as a table or JSON
fn print_results(summaries: &[report::ReadmeSummary], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(summaries)?;
        println!("{}", json_output);
    } else {
        print_table(summaries);
    }
    Ok(())
}

// Prints summaries as a human-readable table in the terminal
fn print_table(summaries: &[report::ReadmeSummary]) {
    println!("{:<45} {:>8} {:>6} {:>6}  {:<40}", "REPOSITORY", "BYTES", "LINES", "LINKS", "TITLE");
    println!("{}", "=".repeat(110));

    for summary in summaries {
        let title = summary.title.as_deref().unwrap_or("-");
        println!(
            "{:<45} {:>8} {:>6} {:>6}  {:<40}",
            truncate(&summary.repository, 45),
            summary.bytes,
            summary.lines,
            summary.links.len(),
            truncate(title, 40)
        );
    }

    println!();
    println!("📚 Collected {} README(s)", summaries.len());
}

// Shortens text for display, respecting char boundaries
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
