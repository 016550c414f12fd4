// src/github/repos.rs
// =============================================================================
// Listing the account's repositories.
//
// Strategy:
// - One request to the REST listing endpoint, at most `per_page` entries
//   (no pagination)
// - Filter by the configured visibility lists
// - Sort newest first by `updated_at`
//
// Filter precedence, checked top to bottom:
//   1. ensure-included name  -> keep (even if excluded or a fork)
//   2. excluded name         -> drop
//   3. fork, not the exception -> drop
//   4. everything else       -> keep
// =============================================================================

use super::client::{cache_busted, HttpClient};
use crate::config::PortfolioConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

/// One entry of the listing endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub fork: bool,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `{api_base}/users/{account}/repos?per_page=N`, without the cache-buster.
pub fn listing_url(config: &PortfolioConfig) -> Result<Url> {
    let raw = format!(
        "{}/users/{}/repos",
        config.api_base.trim_end_matches('/'),
        config.account
    );
    let mut url = Url::parse(&raw)
        .map_err(|e| Error::config(format!("bad listing URL '{}': {}", raw, e)))?;
    url.query_pairs_mut()
        .append_pair("per_page", &config.per_page.to_string());
    Ok(url)
}

/// Downloads and decodes the raw listing, unfiltered and unsorted.
pub async fn list_repositories(
    client: &dyn HttpClient,
    config: &PortfolioConfig,
) -> Result<Vec<RepoSummary>> {
    let url = cache_busted(listing_url(config)?);
    debug!(%url, "fetching repository listing");

    let body = client.get_text(&url).await?;
    let repos: Vec<RepoSummary> = serde_json::from_str(&body)
        .map_err(|e| Error::decode(format!("repository listing for {}", config.account), e))?;

    info!(count = repos.len(), account = %config.account, "fetched repository listing");
    Ok(repos)
}

/// Whether a repository is shown on the portfolio.
pub fn keep_repository(repo: &RepoSummary, config: &PortfolioConfig) -> bool {
    if config.is_ensure_included(&repo.name) {
        debug!(repo = %repo.name, "keeping: ensure-included");
        return true;
    }
    if config.is_excluded(&repo.name) {
        debug!(repo = %repo.name, "dropping: excluded");
        return false;
    }
    if repo.fork && !config.is_fork_exception(&repo.name) {
        debug!(repo = %repo.name, "dropping: fork");
        return false;
    }
    true
}

pub fn filter_repositories(repos: Vec<RepoSummary>, config: &PortfolioConfig) -> Vec<RepoSummary> {
    repos
        .into_iter()
        .filter(|repo| keep_repository(repo, config))
        .collect()
}

/// Newest first. The sort is stable, so equal timestamps keep listing order.
pub fn sort_by_recency(repos: &mut [RepoSummary]) {
    repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// List, filter and sort. An empty result is reported as
/// `Error::EmptyListing` so the caller can fall back.
pub async fn fetch_listing(
    client: &dyn HttpClient,
    config: &PortfolioConfig,
) -> Result<Vec<RepoSummary>> {
    let repos = list_repositories(client, config).await?;
    let mut kept = filter_repositories(repos, config);
    if kept.is_empty() {
        return Err(Error::EmptyListing {
            account: config.account.clone(),
        });
    }
    sort_by_recency(&mut kept);
    Ok(kept)
}

/// A repository named on the command line: a bare name, `owner/name`, or a
/// github.com URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: Option<String>,
    pub name: String,
}

/// Parses a repository reference.
///
/// Supported formats:
///   - repo
///   - owner/repo
///   - https://github.com/owner/repo (optionally ending in `.git` or with
///     more path after it)
///
/// Example:
///   "https://github.com/TFelbor/timeo-java.git" -> (Some("TFelbor"), "timeo-java")
pub fn parse_repo_reference(input: &str) -> Result<RepoRef> {
    let trimmed = input.trim();
    let without_scheme = trimmed
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");

    if without_scheme.contains("://") {
        return Err(Error::config(format!("not a GitHub repository: {}", input)));
    }
    let path = without_scheme
        .strip_prefix("github.com/")
        .unwrap_or(without_scheme);

    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let (owner, name) = match parts.as_slice() {
        [name] => (None, *name),
        // A dotted first segment is another host (`gitlab.com/user/repo`);
        // GitHub account names cannot contain dots.
        [host, _, ..] if host.contains('.') => {
            return Err(Error::config(format!("not a GitHub repository: {}", input)));
        }
        [owner, name, ..] => (Some(owner.to_string()), *name),
        [] => return Err(Error::config(format!("empty repository reference: '{}'", input))),
    };

    let name = name.trim_end_matches(".git");
    if name.is_empty() {
        return Err(Error::config(format!("invalid repository reference: '{}'", input)));
    }

    Ok(RepoRef {
        owner,
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::client::MockHttpClient;

    fn repo(name: &str, fork: bool, updated_at: &str) -> RepoSummary {
        RepoSummary {
            name: name.to_string(),
            html_url: format!("https://github.com/TFelbor/{}", name),
            fork,
            updated_at: updated_at.parse().unwrap(),
            description: None,
        }
    }

    #[test]
    fn test_listing_url() {
        let config = PortfolioConfig::default();
        assert_eq!(
            listing_url(&config).unwrap().as_str(),
            "https://api.github.com/users/TFelbor/repos?per_page=100"
        );

        let config = PortfolioConfig {
            api_base: "http://127.0.0.1:8080/".to_string(),
            account: "someone".to_string(),
            per_page: 30,
            ..PortfolioConfig::default()
        };
        assert_eq!(
            listing_url(&config).unwrap().as_str(),
            "http://127.0.0.1:8080/users/someone/repos?per_page=30"
        );
    }

    #[test]
    fn test_filter_precedence() {
        let config = PortfolioConfig {
            excluded: vec!["hidden".to_string(), "forced".to_string()],
            ensure_included: vec!["forced".to_string(), "forked-but-wanted".to_string()],
            fork_exception: Some("special-fork".to_string()),
            ..PortfolioConfig::default()
        };

        let at = "2024-01-01T00:00:00Z";
        assert!(keep_repository(&repo("plain", false, at), &config));
        assert!(!keep_repository(&repo("hidden", false, at), &config));
        assert!(keep_repository(&repo("forced", false, at), &config));
        assert!(!keep_repository(&repo("someone-elses", true, at), &config));
        assert!(keep_repository(&repo("special-fork", true, at), &config));
        assert!(keep_repository(&repo("forked-but-wanted", true, at), &config));
    }

    #[test]
    fn test_default_config_filters_profile_repo() {
        let config = PortfolioConfig::default();
        let at = "2024-01-01T00:00:00Z";
        assert!(!keep_repository(&repo("TFelbor", false, at), &config));
        assert!(!keep_repository(&repo("portfolio-website", false, at), &config));
        assert!(keep_repository(&repo("ai-hedge-fund", true, at), &config));
        assert!(keep_repository(&repo("timeo-java", false, at), &config));
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut repos = vec![
            repo("old", false, "2023-01-01T00:00:00Z"),
            repo("tie-a", false, "2024-05-01T12:00:00Z"),
            repo("new", false, "2024-06-01T00:00:00Z"),
            repo("tie-b", false, "2024-05-01T12:00:00Z"),
        ];
        sort_by_recency(&mut repos);
        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["new", "tie-a", "tie-b", "old"]);
    }

    #[test]
    fn test_summary_ignores_unknown_fields() {
        let json = r#"[{
            "id": 1,
            "name": "timeo-java",
            "html_url": "https://github.com/TFelbor/timeo-java",
            "fork": false,
            "updated_at": "2024-02-03T04:05:06Z",
            "description": null,
            "stargazers_count": 3
        }]"#;
        let repos: Vec<RepoSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(repos[0].name, "timeo-java");
        assert_eq!(repos[0].description, None);
    }

    #[tokio::test]
    async fn test_fetch_listing_filters_and_sorts() {
        let body = r#"[
            {"name": "older", "html_url": "u1", "fork": false, "updated_at": "2023-01-01T00:00:00Z"},
            {"name": "portfolio-website", "html_url": "u2", "fork": false, "updated_at": "2025-01-01T00:00:00Z"},
            {"name": "newer", "html_url": "u3", "fork": false, "updated_at": "2024-01-01T00:00:00Z"},
            {"name": "random-fork", "html_url": "u4", "fork": true, "updated_at": "2024-06-01T00:00:00Z"}
        ]"#;
        let client = MockHttpClient::new().with_text("/users/TFelbor/repos", body);
        let config = PortfolioConfig::default();

        let repos = fetch_listing(&client, &config).await.unwrap();
        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["newer", "older"]);

        let requested = &client.requests()[0];
        assert!(requested.query().unwrap().contains("per_page=100"));
        assert!(requested.query().unwrap().contains("timestamp="));
    }

    #[tokio::test]
    async fn test_fetch_listing_errors() {
        let config = PortfolioConfig::default();

        let empty = MockHttpClient::new().with_text("/users/TFelbor/repos", "[]");
        assert!(matches!(
            fetch_listing(&empty, &config).await,
            Err(Error::EmptyListing { .. })
        ));

        let garbage = MockHttpClient::new().with_text("/users/TFelbor/repos", "<html>");
        assert!(matches!(
            fetch_listing(&garbage, &config).await,
            Err(Error::Decode { .. })
        ));

        let limited = MockHttpClient::new().with_status("/users/TFelbor/repos", 403);
        assert!(matches!(
            fetch_listing(&limited, &config).await,
            Err(Error::HttpStatus { status: 403, .. })
        ));
    }

    #[test]
    fn test_parse_repo_reference() {
        assert_eq!(
            parse_repo_reference("timeo-java").unwrap(),
            RepoRef { owner: None, name: "timeo-java".to_string() }
        );
        assert_eq!(
            parse_repo_reference("someone/tool").unwrap(),
            RepoRef { owner: Some("someone".to_string()), name: "tool".to_string() }
        );
        assert_eq!(
            parse_repo_reference("https://github.com/user/repo.git").unwrap(),
            RepoRef { owner: Some("user".to_string()), name: "repo".to_string() }
        );
        assert_eq!(
            parse_repo_reference("github.com/user/repo/tree/main").unwrap().name,
            "repo"
        );
        assert_eq!(
            parse_repo_reference("TFelbor/tfelbor.github.io").unwrap(),
            RepoRef { owner: Some("TFelbor".to_string()), name: "tfelbor.github.io".to_string() }
        );
        assert_eq!(
            parse_repo_reference("https://github.com/TFelbor/tfelbor.github.io").unwrap().name,
            "tfelbor.github.io"
        );
        assert_eq!(parse_repo_reference("tfelbor.github.io").unwrap().owner, None);
    }

    #[test]
    fn test_parse_invalid_reference() {
        assert!(parse_repo_reference("https://gitlab.com/user/repo").is_err());
        assert!(parse_repo_reference("gitlab.com/user/repo").is_err());
        assert!(parse_repo_reference("ftp://github.com/user/repo").is_err());
        assert!(parse_repo_reference("").is_err());
        assert!(parse_repo_reference(".git").is_err());
    }
}
