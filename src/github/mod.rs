// src/github/mod.rs
// =============================================================================
// This module handles everything fetched from GitHub.
//
// Currently implements:
// - The HTTP seam (`HttpClient`) with a reqwest client and a scripted mock
// - Listing an account's repositories through the REST API, then filtering
//   and sorting them
// - Fetching README.md from raw.githubusercontent.com with branch and
//   static fallbacks
//
// No authentication: the public API's rate limit is the reason every
// network step has a fallback.
// =============================================================================

pub mod client;
pub mod readme;
pub mod repos;

pub use client::{cache_busted, HttpClient, MockHttpClient, MockReply, ReqwestHttpClient};
pub use readme::{
    fetch_readme, fetch_readme_with_origin, placeholder_readme, readme_url, ReadmeOrigin,
};
pub use repos::{
    fetch_listing, filter_repositories, keep_repository, list_repositories, listing_url,
    parse_repo_reference, sort_by_recency, RepoRef, RepoSummary,
};
