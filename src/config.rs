// src/config.rs
// =============================================================================
// Runtime configuration for the portfolio pipeline.
//
// Everything tied to one specific GitHub account lives here instead of in the
// pipeline code: which repositories to hide, which to always show, the one
// fork we keep, and a couple of per-repository display overrides.
//
// The defaults reproduce the portfolio this tool was written for. A JSON
// file can override any subset of fields (missing fields keep their
// defaults), and the CLI can override a few of them again on top.
// =============================================================================

use crate::cache::CachePolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// Display text forced for a repository regardless of its host metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleOverride {
    pub title: String,
    /// Used when the README has no content under its first heading.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    /// GitHub account whose repositories are listed.
    pub account: String,
    /// Base URL of the REST API (`/users/{account}/repos` is appended).
    pub api_base: String,
    /// Base URL of the raw-content host (`/{account}/{repo}/{branch}/README.md`).
    pub raw_base: String,
    /// Page size of the single listing request.
    pub per_page: u32,
    /// Branch tried first when downloading a README.
    pub default_branch: String,
    /// Per-request timeout. `None` waits forever.
    pub timeout_secs: Option<u64>,

    /// Never shown unless also in `ensure_included`.
    pub excluded: Vec<String>,
    /// Always shown, even when excluded or forked.
    pub ensure_included: Vec<String>,
    /// The only forked repository that survives the filter.
    pub fork_exception: Option<String>,

    /// Language reported for a project when nothing else was detected.
    pub pinned_languages: BTreeMap<String, String>,
    pub title_overrides: BTreeMap<String, TitleOverride>,

    pub cache_policy: CachePolicy,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        let mut pinned_languages = BTreeMap::new();
        pinned_languages.insert(
            "essay-classification-model-python".to_string(),
            "Python".to_string(),
        );

        let mut title_overrides = BTreeMap::new();
        title_overrides.insert(
            "ai-asset-eval-team".to_string(),
            TitleOverride {
                title: "A.I. Enhanced Finance Dashboard".to_string(),
                description: "An AI-powered dashboard for comprehensive analysis of different \
                              financial securities including stocks, cryptocurrencies, REITs, and ETFs."
                    .to_string(),
            },
        );

        Self {
            account: "TFelbor".to_string(),
            api_base: "https://api.github.com".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            per_page: 100,
            default_branch: "main".to_string(),
            timeout_secs: None,
            excluded: to_strings(&[
                "TFelbor",
                "portfolio-website",
                "agno_library",
                "AI_Resources",
                "GPT_Me",
                "awesome-ai-agents",
                "web-particle-simulator",
            ]),
            ensure_included: to_strings(&[
                "timeo-java",
                "skio-java",
                "sorting-algs-runtime-analysis",
                "parser-java",
                "simple-uno-javafx",
                "simple-stock-tracking-app-javafx",
            ]),
            fork_exception: Some("ai-hedge-fund".to_string()),
            pinned_languages,
            title_overrides,
            cache_policy: CachePolicy::None,
        }
    }
}

impl PortfolioConfig {
    /// Loads a JSON config file. Fields absent from the file keep their
    /// default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| Error::decode(format!("config file {}", path.display()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.account.trim().is_empty() {
            return Err(Error::config("account cannot be empty"));
        }
        if self.per_page == 0 || self.per_page > 100 {
            return Err(Error::config(format!(
                "per_page must be between 1 and 100, got {}",
                self.per_page
            )));
        }
        if self.default_branch.trim().is_empty() {
            return Err(Error::config("default_branch cannot be empty"));
        }
        for (field, value) in [("api_base", &self.api_base), ("raw_base", &self.raw_base)] {
            Url::parse(value)
                .map_err(|e| Error::config(format!("{} '{}' is not a URL: {}", field, value, e)))?;
        }
        Ok(())
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|n| n == name)
    }

    pub fn is_ensure_included(&self, name: &str) -> bool {
        self.ensure_included.iter().any(|n| n == name)
    }

    pub fn is_fork_exception(&self, name: &str) -> bool {
        self.fork_exception.as_deref() == Some(name)
    }

    pub fn pinned_language(&self, name: &str) -> Option<&str> {
        self.pinned_languages.get(name).map(String::as_str)
    }

    pub fn title_override(&self, name: &str) -> Option<&TitleOverride> {
        self.title_overrides.get(name)
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = PortfolioConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.per_page, 100);
        assert_eq!(config.default_branch, "main");
        assert!(config.is_fork_exception("ai-hedge-fund"));
        assert!(config.is_excluded("portfolio-website"));
        assert!(config.is_ensure_included("parser-java"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, r#"{{"account": "someone-else", "cache_policy": "daily"}}"#).unwrap();

        let config = PortfolioConfig::from_json_file(&path).unwrap();
        assert_eq!(config.account, "someone-else");
        assert_eq!(config.cache_policy, CachePolicy::Daily);
        assert_eq!(config.api_base, "https://api.github.com");
        assert!(config.is_ensure_included("timeo-java"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = PortfolioConfig {
            per_page: 0,
            ..PortfolioConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = PortfolioConfig {
            api_base: "not a url".to_string(),
            ..PortfolioConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = PortfolioConfig::from_json_file("/definitely/not/here.json");
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
