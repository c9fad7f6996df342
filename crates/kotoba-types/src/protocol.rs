use crate::dataset::DictionaryEntry;

/// Lookup worker lifecycle. `Error` is terminal; the worker never retries on
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Loading,
    Indexing,
    Ready,
    Error,
}

/// Controller → worker messages
#[derive(Debug, Clone)]
pub enum WorkerRequest {
    Load { source_url: String },
    Search { query: String },
}

/// Worker → controller messages. Every search is answered with either
/// `Result` or `Failed`, never silently dropped.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Ready,
    Error {
        reason: String,
    },
    Result {
        query: String,
        entries: Vec<DictionaryEntry>,
    },
    Failed {
        query: String,
        reason: SearchFailure,
    },
}

/// Why the worker could not answer a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    NotReady { state: LifecycleState },
}
