//! Terminal rendering of scrape and search results.
//! Everything writes to a caller-supplied sink so output can be captured.

use crate::model::{ContentFormat, ScrapeResult, SearchResult};
use std::io::{self, Write};

/// Descriptions and snippets are cut to this many characters before the ellipsis.
pub const SNIPPET_MAX_CHARS: usize = 200;
const NO_TITLE: &str = "No title";

/// First `max` characters of `s` (Unicode scalar values, not bytes).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Content to display for a scrape.
///
/// Markdown is shown whenever the service returned it, whatever `requested` was.
/// HTML is shown only when it was requested and markdown is empty. Nothing is
/// converted between formats.
pub fn display_content(result: &ScrapeResult, requested: ContentFormat) -> Option<&str> {
    if !result.markdown.is_empty() {
        Some(&result.markdown)
    } else if requested == ContentFormat::Html && !result.html.is_empty() {
        Some(&result.html)
    } else {
        None
    }
}

/// Print scraped content, then title and truncated description from metadata.
pub fn write_scrape<W: Write>(
    out: &mut W,
    result: &ScrapeResult,
    requested: ContentFormat,
) -> io::Result<()> {
    if let Some(content) = display_content(result, requested) {
        writeln!(out, "{}", content)?;
    }
    if let Some(title) = result.meta_str("title") {
        writeln!(out, "\n📄 Title: {}", title)?;
    }
    if let Some(description) = result.meta_str("description") {
        writeln!(
            out,
            "📝 Description: {}...",
            truncate_chars(description, SNIPPET_MAX_CHARS)
        )?;
    }
    Ok(())
}

/// Print a 1-based numbered list: title, URL, optional snippet, blank line.
pub fn write_search<W: Write>(out: &mut W, result: &SearchResult) -> io::Result<()> {
    for (i, hit) in result.results.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, hit.title.as_deref().unwrap_or(NO_TITLE))?;
        writeln!(out, "   {}", hit.url.as_deref().unwrap_or(""))?;
        let snippet = truncate_chars(hit.summary(), SNIPPET_MAX_CHARS);
        if !snippet.is_empty() {
            writeln!(out, "   {}...", snippet)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
