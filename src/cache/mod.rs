// src/cache/mod.rs
// =============================================================================
// Local caching of GitHub data.
//
// The pipeline never talks to a storage substrate directly. It gets a
// `KeyValueStore` (string keys, string values) and a `CachePolicy`:
//
// - `none`:  the store is cleared before every network call and never read.
//            Every page load sees fresh data.
// - `daily`: keys carry the current UTC date, so entries rotate once a day.
//            Only live data is written; fallback data is never cached.
//
// Cache problems are never errors for the caller. `ScopedCache` logs them
// and carries on as if the cache were empty.
//
// Submodules:
// - store: in-memory and JSON-file implementations of `KeyValueStore`
// =============================================================================

mod store;

pub use store::{FileStore, MemoryStore};

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A string key/value store. Implementations synchronize internally so a
/// shared reference can be used from async code.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// How the pipeline uses its store.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// Always fetch fresh data; clear the store before each request.
    #[default]
    None,
    /// Reuse data fetched earlier the same (UTC) day.
    Daily,
}

impl CachePolicy {
    /// The scope identifier that prefixes every key, or `None` when the
    /// policy never reads or writes entries.
    pub fn scope(self, today: NaiveDate) -> Option<String> {
        match self {
            CachePolicy::None => None,
            CachePolicy::Daily => Some(today.format("%Y-%m-%d").to_string()),
        }
    }
}

pub fn projects_key(scope: &str) -> String {
    format!("github_projects_{}", scope)
}

pub fn readme_key(scope: &str, name: &str, branch: &str) -> String {
    format!("readme_{}_{}_{}", scope, name, branch)
}

/// A store seen through a policy and a scope. All operations are
/// best-effort.
pub struct ScopedCache<'a> {
    store: &'a dyn KeyValueStore,
    policy: CachePolicy,
    scope: Option<String>,
}

impl<'a> ScopedCache<'a> {
    pub fn new(store: &'a dyn KeyValueStore, policy: CachePolicy, today: NaiveDate) -> Self {
        Self {
            store,
            policy,
            scope: policy.scope(today),
        }
    }

    /// Called right before a network request. With the `none` policy this
    /// wipes the store; failures are logged and swallowed.
    pub fn before_request(&self) {
        if self.policy != CachePolicy::None {
            return;
        }
        match self.store.clear() {
            Ok(()) => debug!("cleared local cache before request"),
            Err(e) => warn!(error = %e, "could not clear local cache, continuing"),
        }
    }

    pub fn readme(&self, name: &str, branch: &str) -> Option<String> {
        let key = readme_key(self.scope.as_deref()?, name, branch);
        self.read(&key)
    }

    pub fn store_readme(&self, name: &str, branch: &str, readme: &str) {
        if let Some(scope) = self.scope.as_deref() {
            self.write(&readme_key(scope, name, branch), readme);
        }
    }

    pub fn projects(&self) -> Option<String> {
        let key = projects_key(self.scope.as_deref()?);
        self.read(&key)
    }

    pub fn store_projects(&self, json: &str) {
        if let Some(scope) = self.scope.as_deref() {
            self.write(&projects_key(scope), json);
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(Some(value)) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!(key, error = %e, "cache write failed, ignoring");
        }
    }
}
