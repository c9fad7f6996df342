use kotoba_types::{LifecycleState, SearchFailure};
use thiserror::Error;

/// Dataset acquisition failure. Fatal to the worker instance: the lifecycle
/// moves to `Error` and stays there.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("dataset fetch failed: {0}")]
    Fetch(String),

    #[error("dataset parse failed: {0}")]
    Parse(String),

    #[error("dictionary unavailable: {0}")]
    Unavailable(String),
}

/// Per-search failure. Degrades to "no results" at the UI boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("dictionary not ready (state: {state:?})")]
    NotReady { state: LifecycleState },

    #[error("lookup worker is gone: {0}")]
    WorkerGone(String),
}

impl From<SearchFailure> for SearchError {
    fn from(failure: SearchFailure) -> Self {
        match failure {
            SearchFailure::NotReady { state } => SearchError::NotReady { state },
        }
    }
}
