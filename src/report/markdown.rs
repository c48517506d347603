// src/report/markdown.rs
// =============================================================================
// This module pulls a few facts out of README markdown.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Is a streaming parser, so we never build a full document tree
//
// Facts we extract:
// - the title: text of the first heading, whatever its level
// - every HTTP/HTTPS link target
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};

/// Returns the text of the first heading, or None if there is no heading.
///
/// Inline markup is flattened: "# The `snap` plugin" gives "The snap plugin".
pub fn first_heading(markdown: &str) -> Option<String> {
    let mut title: Option<String> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading(..)) => title = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(title) = title.as_mut() {
                    title.push_str(&text);
                }
            }
            Event::End(Tag::Heading(..)) => {
                let text = title.take()?.trim().to_string();
                if !text.is_empty() {
                    return Some(text);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extracts all HTTP/HTTPS links from Markdown text, in document order.
///
/// Example input:
///   "Check out [Snap](https://github.com/intelsdi-x/snap)!"
///
/// Example output:
///   vec!["https://github.com/intelsdi-x/snap"]
pub fn extract_markdown_links(markdown: &str) -> Vec<String> {
    let mut links = Vec::new();

    // In pulldown-cmark 0.9, Link is Tag::Link(link_type, dest_url, title).
    // Images use the same shape, and a badge image is still a link we report.
    for event in Parser::new(markdown) {
        if let Event::Start(Tag::Link(_, dest_url, _) | Tag::Image(_, dest_url, _)) = event {
            if is_http_link(&dest_url) {
                links.push(dest_url.to_string());
            }
        }
    }

    links
}

// mailto:, relative paths and anchors are not interesting here
fn is_http_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
