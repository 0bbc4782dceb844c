//! Error types for page resolution.

use pageflow_store::StoreError;
use std::fmt;
use thiserror::Error;

/// Result type for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Where a failing data hook was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookScope {
    /// A module inside the named zone.
    Zone(String),
    /// A site-wide component.
    Global,
}

impl fmt::Display for HookScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zone(name) => write!(f, "zone `{name}`"),
            Self::Global => f.write_str("global components"),
        }
    }
}

/// Errors that can occur while resolving a page.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No content backend could be built (missing site identifier, credential...).
    #[error("content backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A custom data hook failed.
    #[error("failed to get custom data for `{component}` in {scope}: {source}")]
    Enrichment {
        component: String,
        scope: HookScope,
        #[source]
        source: anyhow::Error,
    },

    /// A module names a component that is not registered. Fatal outside
    /// preview and dev mode.
    #[error("component for module `{component}` in zone `{zone}` was not found in the module list")]
    UnresolvedComponent { component: String, zone: String },

    /// Content store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ResolveError {
    /// Whether this error is absorbed into a not-found result instead of
    /// failing the call.
    #[must_use]
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }
}
