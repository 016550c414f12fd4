// src/project.rs
// =============================================================================
// The records handed to the page renderer.
//
// JSON field names follow what the portfolio front-end already reads:
// `html_url` and `updated_at` as GitHub spells them, `readmeTitle`,
// `mostRecent`, `portfolioProjects` and `otherProjects` in camelCase.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One repository, enriched with display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub fork: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    pub title: String,
    pub description: String,
    #[serde(rename = "readmeTitle")]
    pub readme_title: String,
    /// No duplicates.
    #[serde(default)]
    pub languages: Vec<String>,
    /// No duplicates, at most 5.
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Where a ProjectCollection came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Source {
    /// Fetched from GitHub during this call.
    #[default]
    Live,
    /// Read back from today's cache entry.
    Cache,
    /// The built-in static table.
    Fallback,
}

/// The pipeline's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCollection {
    pub most_recent: Project,
    /// Always empty; kept so existing consumers find the key.
    #[serde(default)]
    pub portfolio_projects: Vec<Project>,
    /// Every shown project, newest first.
    pub other_projects: Vec<Project>,
    #[serde(skip)]
    pub source: Source,
}

impl ProjectCollection {
    pub fn len(&self) -> usize {
        self.other_projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.other_projects.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Project> {
        self.other_projects.iter().find(|p| p.name == name)
    }
}
