// src/pipeline.rs
// =============================================================================
// The portfolio pipeline: list -> README -> metadata -> record.
//
// `Portfolio` owns its collaborators (HTTP client, key/value store, static
// fallback tables) and exposes the three operations the page needs:
//
// - fetch_github_projects:   the full ProjectCollection, never fails
// - fetch_readme_on_demand:  one README, never fails
// - clear_cache:             wipe the store
//
// Requests are awaited one after another, READMEs in listing order. The
// only step whose failure changes the overall result is the listing: if it
// fails, the whole static collection is returned instead.
// =============================================================================

use crate::cache::{KeyValueStore, ScopedCache};
use crate::config::PortfolioConfig;
use crate::error::{Error, Result};
use crate::fallback::FallbackProvider;
use crate::github::{fetch_listing, fetch_readme, fetch_readme_with_origin, HttpClient, RepoSummary};
use crate::metadata::{
    determine_languages, determine_technologies, extract_content, extract_title,
    format_repo_name_for_display,
};
use crate::project::{Project, ProjectCollection, Source};
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

const NO_DESCRIPTION: &str = "No description available.";
const DIVERGENCE_PREFIX: &str = "Details: ";

pub struct Portfolio {
    config: PortfolioConfig,
    client: Box<dyn HttpClient>,
    store: Box<dyn KeyValueStore>,
    fallback: FallbackProvider,
    // Fixed cache date; `None` means today in UTC
    date: Option<NaiveDate>,
}

impl Portfolio {
    /// Validates `config` and loads the built-in fallback tables.
    pub fn new(
        config: PortfolioConfig,
        client: Box<dyn HttpClient>,
        store: Box<dyn KeyValueStore>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            client,
            store,
            fallback: FallbackProvider::builtin()?,
            date: None,
        })
    }

    /// Replaces the built-in fallback tables.
    pub fn with_fallback(mut self, fallback: FallbackProvider) -> Self {
        self.fallback = fallback;
        self
    }

    /// Pins the date used to scope daily cache keys.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    pub fn fallback(&self) -> &FallbackProvider {
        &self.fallback
    }

    fn cache(&self) -> ScopedCache<'_> {
        let today = self.date.unwrap_or_else(|| Utc::now().date_naive());
        ScopedCache::new(self.store.as_ref(), self.config.cache_policy, today)
    }

    /// Lists, enriches and returns every shown project.
    ///
    /// Falls back to the static collection when the listing cannot be
    /// fetched, decoded, or comes back empty after filtering.
    pub async fn fetch_github_projects(&self) -> ProjectCollection {
        let cache = self.cache();

        if let Some(json) = cache.projects() {
            match serde_json::from_str::<ProjectCollection>(&json) {
                Ok(collection) => {
                    info!(count = collection.len(), "projects served from cache");
                    return ProjectCollection {
                        source: Source::Cache,
                        ..collection
                    };
                }
                Err(e) => warn!(error = %e, "ignoring unreadable cached projects"),
            }
        }

        cache.before_request();

        match self.fetch_live(&cache).await {
            Ok((collection, all_readmes_live)) => {
                if !all_readmes_live {
                    info!("some READMEs came from fallback data, not caching projects");
                    return collection;
                }
                match serde_json::to_string(&collection) {
                    Ok(json) => cache.store_projects(&json),
                    Err(e) => warn!(error = %e, "could not serialize projects for the cache"),
                }
                collection
            }
            Err(e) => {
                warn!(error = %e, "falling back to built-in projects");
                self.fallback.projects()
            }
        }
    }

    // The flag is false when any README came from the built-in table or
    // was synthesized.
    async fn fetch_live(&self, cache: &ScopedCache<'_>) -> Result<(ProjectCollection, bool)> {
        let repos = fetch_listing(self.client.as_ref(), &self.config).await?;

        let mut projects = Vec::with_capacity(repos.len());
        let mut all_readmes_live = true;
        for repo in &repos {
            let (readme, origin) = fetch_readme_with_origin(
                self.client.as_ref(),
                &self.config,
                cache,
                &self.fallback,
                &repo.name,
                &self.config.default_branch,
            )
            .await;
            all_readmes_live &= origin.is_live();
            projects.push(assemble_project(repo, &readme, &self.config));
        }

        let most_recent = projects.first().cloned().ok_or_else(|| Error::EmptyListing {
            account: self.config.account.clone(),
        })?;

        info!(count = projects.len(), most_recent = %most_recent.name, "assembled live projects");
        let collection = ProjectCollection {
            most_recent,
            portfolio_projects: Vec::new(),
            other_projects: projects,
            source: Source::Live,
        };
        Ok((collection, all_readmes_live))
    }

    /// Fetches one README by repository name. `branch` defaults to the
    /// configured default branch.
    pub async fn fetch_readme_on_demand(&self, repo_name: &str, branch: Option<&str>) -> String {
        let branch = branch.unwrap_or(self.config.default_branch.as_str());
        let cache = self.cache();
        fetch_readme(
            self.client.as_ref(),
            &self.config,
            &cache,
            &self.fallback,
            repo_name,
            branch,
        )
        .await
    }

    /// Clears every entry in the store.
    pub fn clear_cache(&self) -> Result<()> {
        self.store.clear()?;
        debug!("cache cleared");
        Ok(())
    }
}

/// Builds the displayed record for one repository from its README.
///
/// - `readmeTitle`: first README heading, or the repository name
/// - `title`: configured override, else the host description, else the
///   README heading, else the upper-cased display name
/// - `description`: the text under the README heading, else the
///   override's description, else a fixed placeholder; prefixed with
///   `Details: ` if it would equal the title
pub fn assemble_project(repo: &RepoSummary, readme: &str, config: &PortfolioConfig) -> Project {
    let heading = extract_title(readme);
    let content = extract_content(readme);
    let readme_title = heading.clone().unwrap_or_else(|| repo.name.clone());

    let (title, description) = match config.title_override(&repo.name) {
        Some(title_override) => (
            title_override.title.clone(),
            content.unwrap_or_else(|| title_override.description.clone()),
        ),
        None => {
            let host_description = repo
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string);
            let title = host_description
                .or(heading)
                .unwrap_or_else(|| format_repo_name_for_display(&repo.name));
            (title, content.unwrap_or_else(|| NO_DESCRIPTION.to_string()))
        }
    };

    let description = if description == title {
        debug!(repo = %repo.name, "title equals description, prefixing description");
        format!("{}{}", DIVERGENCE_PREFIX, description)
    } else {
        description
    };

    Project {
        name: repo.name.clone(),
        html_url: repo.html_url.clone(),
        fork: repo.fork,
        updated_at: Some(repo.updated_at),
        title,
        description,
        readme_title,
        languages: determine_languages(&repo.name, readme, config.pinned_language(&repo.name)),
        technologies: determine_technologies(readme),
    }
}
