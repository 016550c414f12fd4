// src/github/readme.rs
// =============================================================================
// Fetching one repository's README.
//
// Strategy:
// - Serve today's cached copy when the daily policy has one
// - Fetch README.md from the raw-content host on the requested branch
// - If the host answers with an error status, retry once on `master`
//   (older repositories never renamed their default branch)
// - If that fails too, or the network is down, use the built-in README
// - If there is no built-in README either, synthesize a placeholder
//
// `fetch_readme` therefore always returns text.
// =============================================================================

use super::client::{cache_busted, HttpClient};
use crate::cache::ScopedCache;
use crate::config::PortfolioConfig;
use crate::error::{Error, Result};
use crate::fallback::FallbackProvider;
use tracing::{debug, info, warn};
use url::Url;

const FALLBACK_BRANCH: &str = "master";

/// `{raw_base}/{account}/{name}/{branch}/README.md`, without the cache-buster.
pub fn readme_url(config: &PortfolioConfig, repo_name: &str, branch: &str) -> Result<Url> {
    let raw = format!(
        "{}/{}/{}/{}/README.md",
        config.raw_base.trim_end_matches('/'),
        config.account,
        repo_name,
        branch
    );
    Url::parse(&raw).map_err(|e| Error::config(format!("bad README URL '{}': {}", raw, e)))
}

/// The text used when no README can be found anywhere.
///
/// Example:
///   "my_cool-tool" -> "# my cool tool\n\nNo README content available for this project."
pub fn placeholder_readme(repo_name: &str) -> String {
    format!(
        "# {}\n\nNo README content available for this project.",
        repo_name.replace(['_', '-'], " ")
    )
}

/// Where a README returned by `fetch_readme_with_origin` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadmeOrigin {
    /// Today's cache entry (which only ever holds host text).
    Cache,
    /// Downloaded from the raw-content host.
    Host,
    /// The built-in README table.
    Builtin,
    /// Synthesized by `placeholder_readme`.
    Placeholder,
}

impl ReadmeOrigin {
    /// True when the text reflects what the host currently serves.
    pub fn is_live(self) -> bool {
        matches!(self, ReadmeOrigin::Cache | ReadmeOrigin::Host)
    }
}

/// Returns the README of `repo_name` on `branch`. Never fails.
pub async fn fetch_readme(
    client: &dyn HttpClient,
    config: &PortfolioConfig,
    cache: &ScopedCache<'_>,
    fallback: &FallbackProvider,
    repo_name: &str,
    branch: &str,
) -> String {
    fetch_readme_with_origin(client, config, cache, fallback, repo_name, branch)
        .await
        .0
}

/// Like `fetch_readme`, but also reports where the text came from.
pub async fn fetch_readme_with_origin(
    client: &dyn HttpClient,
    config: &PortfolioConfig,
    cache: &ScopedCache<'_>,
    fallback: &FallbackProvider,
    repo_name: &str,
    branch: &str,
) -> (String, ReadmeOrigin) {
    cache.before_request();

    if let Some(cached) = cache.readme(repo_name, branch) {
        debug!(repo = repo_name, branch, "README served from cache");
        return (cached, ReadmeOrigin::Cache);
    }

    match fetch_from_host(client, config, repo_name, branch).await {
        Ok(readme) => {
            cache.store_readme(repo_name, branch, &readme);
            return (readme, ReadmeOrigin::Host);
        }
        Err(e) => warn!(repo = repo_name, error = %e, "could not fetch README, using fallback"),
    }

    match fallback.require_readme(repo_name) {
        Ok(readme) => {
            info!(repo = repo_name, "using built-in README");
            (readme.to_string(), ReadmeOrigin::Builtin)
        }
        Err(e) => {
            debug!(repo = repo_name, error = %e, "no built-in README, using placeholder");
            (placeholder_readme(repo_name), ReadmeOrigin::Placeholder)
        }
    }
}

// Requested branch, then `master` if the host rejected the first request.
async fn fetch_from_host(
    client: &dyn HttpClient,
    config: &PortfolioConfig,
    repo_name: &str,
    branch: &str,
) -> Result<String> {
    let url = cache_busted(readme_url(config, repo_name, branch)?);
    debug!(%url, "fetching README");

    match client.get_text(&url).await {
        Ok(readme) => Ok(readme),
        Err(e @ Error::HttpStatus { .. }) if branch != FALLBACK_BRANCH => {
            debug!(repo = repo_name, branch, error = %e, "retrying README on master");
            let retry = cache_busted(readme_url(config, repo_name, FALLBACK_BRANCH)?);
            client.get_text(&retry).await
        }
        Err(e) => Err(e),
    }
}
