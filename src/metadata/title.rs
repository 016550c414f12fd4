// src/metadata/title.rs
// =============================================================================
// Title and description extraction from README text.
//
// Title: the first `# Heading`, whitespace-normalized, max 50 characters.
// Description: whatever sits between that heading and the next `#`/`##`
// heading, whitespace-normalized, max 250 characters.
// =============================================================================

use super::{collapse_whitespace, h1_regex, truncate_with_ellipsis};
use regex::Regex;
use std::sync::OnceLock;

const MAX_TITLE_CHARS: usize = 50;
const MAX_CONTENT_CHARS: usize = 250;
// Without a closing heading, only this many lines after the title are kept
const MAX_TRAILING_LINES: usize = 10;

/// Extracts a display title from the first level-1 heading.
///
/// Tries, in order:
/// 1. `# Title` (a `#` followed by whitespace)
/// 2. a looser `#Title` on a single line
/// 3. the first line that starts with `#` at all
///
/// Returns `None` when the README has no heading.
///
/// Example:
///   "#  Foo \t Bar\n\ntext" -> Some("Foo Bar")
pub fn extract_title(readme: &str) -> Option<String> {
    static LOOSE: OnceLock<Regex> = OnceLock::new();

    if let Some(title) = h1_regex()
        .captures(readme)
        .and_then(|caps| caps.get(1))
        .and_then(|m| clean_title(m.as_str()))
    {
        return Some(title);
    }

    let loose = LOOSE
        .get_or_init(|| Regex::new(r"(?m)^\s*#\s*(.+?)\s*$").expect("loose heading pattern must compile"));
    if let Some(title) = loose
        .captures(readme)
        .and_then(|caps| caps.get(1))
        .and_then(|m| clean_title(m.as_str()))
    {
        return Some(title);
    }

    readme
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with('#'))
        .and_then(|line| clean_title(line.trim_start_matches('#')))
}

fn clean_title(raw: &str) -> Option<String> {
    let title = collapse_whitespace(raw);
    if title.is_empty() {
        return None;
    }
    Some(truncate_with_ellipsis(title, MAX_TITLE_CHARS))
}

/// Extracts the text under the first level-1 heading, up to the next
/// level-1 or level-2 heading.
///
/// Returns `None` when there is no level-1 heading or nothing under it.
pub fn extract_content(readme: &str) -> Option<String> {
    static NEXT_HEADING: OnceLock<Regex> = OnceLock::new();

    let heading = h1_regex().find(readme)?;
    let rest = &readme[heading.end()..];

    let next = NEXT_HEADING
        .get_or_init(|| Regex::new(r"(?m)^\s*#{1,2}\s+").expect("next heading pattern must compile"));

    let content = match next.find(rest) {
        Some(m) => rest[..m.start()].trim().to_string(),
        None => {
            let lines: Vec<&str> = rest.trim().split('\n').take(MAX_TRAILING_LINES).collect();
            lines.join("\n").trim().to_string()
        }
    };

    let content = collapse_whitespace(&content);
    if content.is_empty() {
        return None;
    }
    Some(truncate_with_ellipsis(content, MAX_CONTENT_CHARS))
}

/// Turns `my-cool_repo` into `MY COOL REPO`.
pub fn format_repo_name_for_display(repo_name: &str) -> String {
    repo_name.replace(['-', '_'], " ").to_uppercase()
}
