use chrono::DateTime;
use comet_core::{Event, Thread, format_difficulty, leading_zero_bits};
use std::collections::HashSet;

/// Characters of content shown per comment line.
const SNIPPET_LEN: usize = 72;

/// Render a resolved thread as an indented tree.
///
/// Top-level comments appear newest first, replies oldest first,
/// mirroring the resolver's ordering. Traversal carries its own
/// visited set so a cyclic dump renders finitely.
pub fn render_thread(thread: &Thread) -> String {
    let mut out = String::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for comment in thread.top_level() {
        render_subtree(thread, comment, 0, &mut visited, &mut out);
    }

    out
}

fn render_subtree<'a>(
    thread: &Thread<'a>,
    comment: &'a Event,
    depth: usize,
    visited: &mut HashSet<&'a str>,
    out: &mut String,
) {
    if !visited.insert(comment.id.as_str()) {
        return;
    }

    out.push_str(&comment_line(comment, depth));
    out.push('\n');

    for reply in thread.direct_replies(&comment.id) {
        render_subtree(thread, reply, depth + 1, visited, out);
    }
}

/// One display line: timestamp, author, PoW if any, content snippet.
pub fn comment_line(comment: &Event, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let difficulty = leading_zero_bits(&comment.id);

    let pow = if difficulty > 0 {
        format!(" [{}]", format_difficulty(difficulty))
    } else {
        String::new()
    };

    format!(
        "{}{} {}{}: {}",
        indent,
        format_timestamp(comment.created_at),
        short_hex(&comment.pubkey),
        pow,
        snippet(&comment.content),
    )
}

/// Format a unix timestamp as UTC, falling back to the raw number for
/// out-of-range values.
pub fn format_timestamp(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M").to_string(),
        None => timestamp.to_string(),
    }
}

/// Abbreviate a hex id or pubkey for display.
pub fn short_hex(hex: &str) -> &str {
    &hex[..hex.len().min(8)]
}

fn snippet(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    let mut snippet: String = first_line.chars().take(SNIPPET_LEN).collect();
    if first_line.chars().count() > SNIPPET_LEN || content.lines().count() > 1 {
        snippet.push_str("...");
    }
    snippet
}
