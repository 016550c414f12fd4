// src/lib.rs
// =============================================================================
// portfolio-projects: GitHub project cards for a personal portfolio page.
//
// The crate lists an account's public repositories, downloads each README,
// guesses a title, description, languages and technologies from the README
// text, and hands back records ready to render. Every network step has a
// static fallback, so the result is never an error.
//
// Modules:
// - github:   HTTP client seam, repository listing, README retrieval
// - metadata: regex-based title/description/tag extraction
// - pipeline: the `Portfolio` type tying it all together
// - fallback: built-in projects and READMEs
// - cache:    key/value store and cache policy
// - config:   account and visibility settings
// - project:  output records
// - error:    the library error type
// =============================================================================

pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod github;
pub mod metadata;
pub mod pipeline;
pub mod project;

pub use cache::{CachePolicy, FileStore, KeyValueStore, MemoryStore};
pub use config::{PortfolioConfig, TitleOverride};
pub use error::{Error, Result};
pub use fallback::FallbackProvider;
pub use github::{HttpClient, MockHttpClient, ReqwestHttpClient};
pub use pipeline::{assemble_project, Portfolio};
pub use project::{Project, ProjectCollection, Source};
