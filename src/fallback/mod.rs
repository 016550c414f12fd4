// src/fallback/mod.rs
// =============================================================================
// Static fallback data.
//
// When GitHub can't be reached (rate limits, no network, a bad response),
// the portfolio still needs something to show. Two hand-written tables are
// compiled into the binary:
//
// - data/fallback_projects.json: a complete ProjectCollection
// - data/fallback_readmes.json:  repository name -> README text
//
// Lookups are by exact repository name. Nothing else happens here.
// =============================================================================

use crate::error::{Error, Result};
use crate::project::{ProjectCollection, Source};
use std::collections::HashMap;

const PROJECTS_JSON: &str = include_str!("../../data/fallback_projects.json");
const READMES_JSON: &str = include_str!("../../data/fallback_readmes.json");

#[derive(Debug, Clone)]
pub struct FallbackProvider {
    projects: ProjectCollection,
    readmes: HashMap<String, String>,
}

impl FallbackProvider {
    /// The tables shipped with the crate.
    pub fn builtin() -> Result<Self> {
        let projects = serde_json::from_str(PROJECTS_JSON)
            .map_err(|e| Error::decode("built-in fallback projects", e))?;
        let readmes = serde_json::from_str(READMES_JSON)
            .map_err(|e| Error::decode("built-in fallback READMEs", e))?;
        Ok(Self::new(projects, readmes))
    }

    pub fn new(projects: ProjectCollection, readmes: HashMap<String, String>) -> Self {
        Self { projects, readmes }
    }

    /// The hand-written README for `repo_name`, if there is one.
    pub fn readme(&self, repo_name: &str) -> Option<&str> {
        self.readmes.get(repo_name).map(String::as_str)
    }

    /// Like `readme`, but a missing entry is an `Error::NotFound`.
    pub fn require_readme(&self, repo_name: &str) -> Result<&str> {
        self.readme(repo_name)
            .ok_or_else(|| Error::NotFound(format!("fallback README for {}", repo_name)))
    }

    /// The complete static project collection.
    pub fn projects(&self) -> ProjectCollection {
        ProjectCollection {
            source: Source::Fallback,
            ..self.projects.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_parse() {
        let fallback = FallbackProvider::builtin().unwrap();
        let projects = fallback.projects();

        assert_eq!(projects.source, Source::Fallback);
        assert_eq!(projects.most_recent.name, "essay-classification-model-python");
        assert_eq!(projects.other_projects.len(), 22);
        assert!(projects.portfolio_projects.is_empty());
        assert_eq!(projects.other_projects[0], projects.most_recent);
    }

    #[test]
    fn test_builtin_records_respect_invariants() {
        let projects = FallbackProvider::builtin().unwrap().projects();
        for project in &projects.other_projects {
            assert!(project.technologies.len() <= 5, "{}", project.name);
            assert_ne!(project.title, project.description, "{}", project.name);
            assert!(!project.languages.is_empty(), "{}", project.name);
        }
    }

    #[test]
    fn test_readme_lookup_is_exact() {
        let fallback = FallbackProvider::builtin().unwrap();
        let readme = fallback.readme("ai-hedge-fund").unwrap();
        assert!(readme.starts_with("# AI Hedge Fund\n"));

        assert!(fallback.readme("AI-HEDGE-FUND").is_none());
        assert!(fallback.readme("nonexistent-repo").is_none());
        assert!(matches!(
            fallback.require_readme("nonexistent-repo"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_every_fallback_project_has_a_readme() {
        let fallback = FallbackProvider::builtin().unwrap();
        for project in &fallback.projects().other_projects {
            assert!(fallback.readme(&project.name).is_some(), "{}", project.name);
        }
    }
}
