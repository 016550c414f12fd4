// src/metadata/languages.rs
// =============================================================================
// Programming language detection.
//
// Three passes, each only adding tags not already present:
// 1. literal keywords in the repository name (case-sensitive)
// 2. the language table against the README ("Technologies Used" section,
//    then the whole document if that found nothing, then bullet lines)
// 3. if nothing was found, the LANGUAGE_RULES cascade (never empty: the last
//    rule always answers "Programming")
//
// Note that pass 1 is case-sensitive while the README patterns are not, so
// `timeo-java` gets nothing from its name but `Timeo-JAVA` does.
// =============================================================================

use super::{
    apply_first_match, bullet_lines, compile_table, first_heading, push_unique, scan_into,
    section, DefaultRule, Pattern,
};
use regex::Regex;
use std::sync::OnceLock;

// (substrings, language) checked against the raw project name
const NAME_KEYWORDS: &[(&[&str], &str)] = &[
    (&["JAVA", "Java"], "Java"),
    (&["C++", "CPP"], "C++"),
    (&["Python"], "Python"),
    (&["JavaScript", "JS"], "JavaScript"),
];

// The single-letter `R` is matched case-sensitively; everything else ignores case.
// `C++` and `C#` end in non-word characters, so they only get a leading `\b`.
const LANGUAGE_PATTERNS: &[(&str, &str)] = &[
    ("Python", r"(?i)\bPython\b"),
    ("Java", r"(?i)\bJava\b"),
    ("C++", r"(?i)\bC\+\+"),
    ("JavaScript", r"(?i)\bJavaScript\b"),
    ("TypeScript", r"(?i)\bTypeScript\b"),
    ("Go", r"(?i)\bGo\b|\bGolang\b"),
    ("Ruby", r"(?i)\bRuby\b"),
    ("PHP", r"(?i)\bPHP\b"),
    ("C#", r"(?i)\bC#"),
    ("Swift", r"(?i)\bSwift\b"),
    ("Kotlin", r"(?i)\bKotlin\b"),
    ("Rust", r"(?i)\bRust\b"),
    ("Scala", r"(?i)\bScala\b"),
    ("R", r"\bR\b"),
];

fn language_table() -> &'static [Pattern] {
    static TABLE: OnceLock<Vec<Pattern>> = OnceLock::new();
    TABLE.get_or_init(|| compile_table(LANGUAGE_PATTERNS))
}

fn technologies_used_heading() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        Regex::new(r"(?i)## Technologies Used").expect("section pattern must compile")
    })
}

/// Determines the languages of a project from its name and README.
///
/// `pinned` is the configured language for this project, used only when
/// nothing could be detected.
///
/// Example:
///   ("aStar-robotics-java-cpp", "# A* ...\n- Java\n- C++", None) -> ["Java", "C++"]
pub fn determine_languages(project_name: &str, readme: &str, pinned: Option<&str>) -> Vec<String> {
    let mut languages = Vec::new();

    for (keywords, language) in NAME_KEYWORDS {
        if keywords.iter().any(|k| project_name.contains(k)) {
            push_unique(&mut languages, language);
        }
    }

    if !readme.is_empty() {
        let table = language_table();

        if let Some(tech_section) = section(readme, technologies_used_heading()) {
            scan_into(table, tech_section, &mut languages);
        }

        if languages.is_empty() {
            scan_into(table, readme, &mut languages);
        }

        for bullet in bullet_lines(readme) {
            scan_into(table, bullet, &mut languages);
        }
    }

    if languages.is_empty() {
        let hints = LanguageHints::new(project_name, readme, pinned);
        if let Some(defaults) = apply_first_match(LANGUAGE_RULES, &hints) {
            for language in defaults {
                push_unique(&mut languages, &language);
            }
        }
    }

    languages
}

/// What the default language rules look at, precomputed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageHints {
    pub pinned: Option<String>,
    pub name_upper: String,
    pub name_lower: String,
    /// First README heading, uppercased.
    pub title_upper: String,
    pub readme_mentions_machine_learning: bool,
}

impl LanguageHints {
    pub fn new(project_name: &str, readme: &str, pinned: Option<&str>) -> Self {
        Self {
            pinned: pinned.map(str::to_string),
            name_upper: project_name.to_uppercase(),
            name_lower: project_name.to_lowercase(),
            title_upper: first_heading(readme).unwrap_or_default().to_uppercase(),
            readme_mentions_machine_learning: readme.to_lowercase().contains("machine learning"),
        }
    }

    fn name_is_algorithmic(&self) -> bool {
        ["ALGORITHM", "RUNTIME", "ANALYSIS"]
            .iter()
            .any(|k| self.name_upper.contains(k))
    }
}

/// Fallback cascade for projects where no language was detected.
pub static LANGUAGE_RULES: &[DefaultRule<LanguageHints>] = &[
    DefaultRule {
        name: "pinned",
        applies: has_pinned,
        defaults: pinned_language,
    },
    DefaultRule {
        name: "java-name",
        applies: name_mentions_java_upper,
        defaults: java,
    },
    DefaultRule {
        name: "algorithm-name-java-title",
        applies: algorithmic_with_java_title,
        defaults: java,
    },
    DefaultRule {
        name: "algorithm-name",
        applies: algorithmic,
        defaults: algorithm,
    },
    DefaultRule {
        name: "machine-learning",
        applies: machine_learning,
        defaults: python,
    },
    DefaultRule {
        name: "python-name",
        applies: name_mentions_python,
        defaults: python,
    },
    DefaultRule {
        name: "java-name-lower",
        applies: name_mentions_java_lower,
        defaults: java,
    },
    DefaultRule {
        name: "javascript-name",
        applies: name_mentions_javascript,
        defaults: javascript,
    },
    DefaultRule {
        name: "generic",
        applies: always,
        defaults: programming,
    },
];

fn has_pinned(h: &LanguageHints) -> bool {
    h.pinned.is_some()
}

fn name_mentions_java_upper(h: &LanguageHints) -> bool {
    h.name_upper.contains("JAVA")
}

fn algorithmic_with_java_title(h: &LanguageHints) -> bool {
    h.name_is_algorithmic() && h.title_upper.contains("JAVA")
}

fn algorithmic(h: &LanguageHints) -> bool {
    h.name_is_algorithmic()
}

fn machine_learning(h: &LanguageHints) -> bool {
    h.name_lower.contains("ai")
        || h.name_lower.contains("machine learning")
        || h.readme_mentions_machine_learning
}

fn name_mentions_python(h: &LanguageHints) -> bool {
    h.name_lower.contains("python")
}

fn name_mentions_java_lower(h: &LanguageHints) -> bool {
    h.name_lower.contains("java")
}

fn name_mentions_javascript(h: &LanguageHints) -> bool {
    h.name_lower.contains("js") || h.name_lower.contains("javascript")
}

fn always(_: &LanguageHints) -> bool {
    true
}

fn pinned_language(h: &LanguageHints) -> Vec<String> {
    h.pinned.iter().cloned().collect()
}

fn java(_: &LanguageHints) -> Vec<String> {
    vec!["Java".to_string()]
}

fn algorithm(_: &LanguageHints) -> Vec<String> {
    vec!["Algorithm".to_string()]
}

fn python(_: &LanguageHints) -> Vec<String> {
    vec!["Python".to_string()]
}

fn javascript(_: &LanguageHints) -> Vec<String> {
    vec!["JavaScript".to_string()]
}

fn programming(_: &LanguageHints) -> Vec<String> {
    vec!["Programming".to_string()]
}
