// src/metadata/mod.rs
// =============================================================================
// This module turns raw README text into display metadata.
//
// Everything here is a pure function over strings: no I/O, no state.
//
// Submodules:
// - title: first-heading title and the paragraph under it
// - languages: programming language tags
// - technologies: framework / domain tags (at most 5)
// - rules: ordered first-match-wins default rules used when the README
//          itself says too little
//
// The matching is best-effort on purpose: README text is free-form, so a
// miss just means a default tag later on, never an error.
// =============================================================================

mod languages;
mod rules;
mod technologies;
mod title;

pub use languages::{determine_languages, LanguageHints, LANGUAGE_RULES};
pub use rules::{apply_first_match, first_match, DefaultRule};
pub use technologies::{determine_technologies, TechnologyHints, MAX_TECHNOLOGIES, TECHNOLOGY_RULES};
pub use title::{extract_content, extract_title, format_repo_name_for_display};

use regex::Regex;
use std::sync::OnceLock;

// A named tag and the pattern that detects it in free text
pub(crate) struct Pattern {
    pub name: &'static str,
    pub regex: Regex,
}

// Compiles a static (name, pattern) table. The tables are literals in this
// crate and covered by tests, so a bad pattern is a programming error.
pub(crate) fn compile_table(entries: &[(&'static str, &str)]) -> Vec<Pattern> {
    entries
        .iter()
        .map(|(name, pattern)| Pattern {
            name,
            regex: Regex::new(pattern).expect("built-in tag pattern must compile"),
        })
        .collect()
}

// Appends every table entry matching `text` that isn't already present.
// Table order decides insertion order.
pub(crate) fn scan_into(table: &[Pattern], text: &str, found: &mut Vec<String>) {
    for pattern in table {
        if pattern.regex.is_match(text) {
            push_unique(found, pattern.name);
        }
    }
}

pub(crate) fn push_unique(found: &mut Vec<String>, name: &str) {
    if !found.iter().any(|existing| existing == name) {
        found.push(name.to_string());
    }
}

// The first level-1 heading: `#`, at least one whitespace, then the rest of
// the line. Multi-line, so `^` is any line start.
pub(crate) fn h1_regex() -> &'static Regex {
    static H1: OnceLock<Regex> = OnceLock::new();
    H1.get_or_init(|| Regex::new(r"(?m)^\s*#\s+([^\n]+)").expect("heading pattern must compile"))
}

/// Raw text of the first level-1 heading, trimmed but otherwise untouched.
pub(crate) fn first_heading(readme: &str) -> Option<&str> {
    h1_regex()
        .captures(readme)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// The text of a `## ...` section, from its heading up to the next `##`
/// (or the end of the document).
pub(crate) fn section<'a>(readme: &'a str, heading: &Regex) -> Option<&'a str> {
    let found = heading.find(readme)?;
    let rest = &readme[found.end()..];
    let end = rest
        .find("##")
        .map(|offset| found.end() + offset)
        .unwrap_or(readme.len());
    Some(&readme[found.start()..end])
}

/// Markdown bullet lines (`- item` or `* item`), without the marker.
pub(crate) fn bullet_lines(readme: &str) -> impl Iterator<Item = &str> {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    let regex = BULLET
        .get_or_init(|| Regex::new(r"(?m)^[ \t]*[-*][ \t]+(.+)$").expect("bullet pattern must compile"));
    regex
        .captures_iter(readme)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Collapses whitespace runs into single spaces and trims.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to `max` characters, the last three being `...`.
pub(crate) fn truncate_with_ellipsis(text: String, max: usize) -> String {
    if text.chars().count() <= max {
        return text;
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_heading_skips_level_two() {
        let readme = "## Not this\n\n#   The Title  \nbody";
        assert_eq!(first_heading(readme), Some("The Title"));
        assert_eq!(first_heading("no headings here"), None);
    }

    #[test]
    fn test_section_stops_at_next_heading() {
        let heading = Regex::new(r"(?i)## Technologies Used").unwrap();
        let readme = "# T\n\n## Technologies Used\n- Java\n\n## Next\n- Python";
        assert_eq!(
            section(readme, &heading),
            Some("## Technologies Used\n- Java\n\n")
        );

        let tail = "# T\n\n## technologies used\n- Rust";
        assert_eq!(section(tail, &heading), Some("## technologies used\n- Rust"));
        assert_eq!(section("# T", &heading), None);
    }

    #[test]
    fn test_bullet_lines() {
        let readme = "# T\n\n- first item\n  * nested item\nnot - a bullet\n-no space";
        let bullets: Vec<&str> = bullet_lines(readme).collect();
        assert_eq!(bullets, vec!["first item", "nested item"]);
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_with_ellipsis("short".to_string(), 10), "short");
        assert_eq!(truncate_with_ellipsis("abcdefghijk".to_string(), 10), "abcdefg...");
        let accented = "é".repeat(12);
        assert_eq!(truncate_with_ellipsis(accented, 10).chars().count(), 10);
    }

    #[test]
    fn test_push_unique() {
        let mut found = vec!["Java".to_string()];
        push_unique(&mut found, "Java");
        push_unique(&mut found, "Python");
        assert_eq!(found, vec!["Java", "Python"]);
    }
}
