use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use kanal::{AsyncReceiver, AsyncSender};
use kotoba_config::Config;
use kotoba_store::{DatasetCache, DatasetStore};
use kotoba_types::{DictionaryEntry, LifecycleState, LookupResult, WorkerEvent, WorkerRequest};
use tokio::sync::{Mutex, OnceCell, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::error::{LoadError, SearchError};
use crate::fetcher::{DatasetFetcher, HttpFetcher};
use crate::loader::DatasetLoader;
use crate::worker::{self, WorkerHandle};

/// One caller waiting on a query's response
struct Waiter {
    token: u64,
    resolver: oneshot::Sender<Result<Vec<DictionaryEntry>, SearchError>>,
    inserted_at: Instant,
}

/// Waiters per trimmed query string. Concurrent identical queries each get
/// their own slot and all resolve from the one worker response.
type PendingTable = HashMap<String, Vec<Waiter>>;

/// Caller-side handle to the lookup worker: owns the initialization
/// handshake, the pending-query table and result shaping. Cheap to share
/// behind an `Arc`; dropping the last handle stops the worker.
pub struct Lookup {
    requests: AsyncSender<WorkerRequest>,
    pending: Arc<Mutex<PendingTable>>,
    state_rx: watch::Receiver<LifecycleState>,
    error_reason: Arc<Mutex<Option<String>>>,
    init: OnceCell<Result<(), LoadError>>,
    next_token: AtomicU64,
    source_url: String,
    search_timeout: Duration,
    max_results: usize,
    cancel: CancellationToken,
}

impl Lookup {
    /// Production wiring: sled store from config (failure degrades to an
    /// uncached run) and an HTTP fetcher.
    pub fn new(config: &Config) -> Self {
        let cache: Option<Box<dyn DatasetCache>> = match config.cache.resolve_dir() {
            Some(dir) => match DatasetStore::open(&dir) {
                Ok(store) => Some(Box::new(store)),
                Err(e) => {
                    tracing::warn!(error = %e, dir = %dir.display(), "dataset store unavailable, running uncached");
                    None
                }
            },
            None => None,
        };

        let fetcher: Arc<dyn DatasetFetcher> = Arc::new(HttpFetcher::new(Duration::from_secs(
            config.network.fetch_timeout_secs,
        )));

        Self::with_parts(config, cache, fetcher)
    }

    /// Wiring seam used by tests and offline bundles
    pub fn with_parts(
        config: &Config,
        cache: Option<Box<dyn DatasetCache>>,
        fetcher: Arc<dyn DatasetFetcher>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let loader = DatasetLoader::new(cache, fetcher);
        let handle = worker::spawn(
            loader,
            config.network.dataset_version.clone(),
            cancel.child_token(),
        );
        Self::from_handle(handle, config, cancel)
    }

    fn from_handle(handle: WorkerHandle, config: &Config, cancel: CancellationToken) -> Self {
        let pending: Arc<Mutex<PendingTable>> = Arc::new(Mutex::new(HashMap::new()));
        let error_reason = Arc::new(Mutex::new(None));
        let (state_tx, state_rx) = watch::channel(LifecycleState::Uninitialized);

        tokio::spawn(dispatch(
            handle.events,
            pending.clone(),
            state_tx,
            error_reason.clone(),
            cancel.child_token(),
        ));

        Self {
            requests: handle.requests,
            pending,
            state_rx,
            error_reason,
            init: OnceCell::new(),
            next_token: AtomicU64::new(0),
            source_url: config.network.dataset_url.clone(),
            search_timeout: Duration::from_millis(config.lookup.search_timeout_ms),
            max_results: config.lookup.max_results,
            cancel,
        }
    }

    /// Informational mirror of the worker lifecycle
    pub fn state(&self) -> LifecycleState {
        *self.state_rx.borrow()
    }

    /// Initialize the dictionary. Concurrent callers coalesce onto a single
    /// in-flight load; once resolved, every later call returns the same
    /// result immediately. A load failure is terminal for this instance.
    pub async fn ensure_ready(&self) -> Result<(), LoadError> {
        self.init
            .get_or_init(|| async {
                let request = WorkerRequest::Load {
                    source_url: self.source_url.clone(),
                };
                if self.requests.send(request).await.is_err() {
                    return Err(LoadError::Unavailable("lookup worker is gone".to_string()));
                }

                let mut state_rx = self.state_rx.clone();
                loop {
                    match *state_rx.borrow_and_update() {
                        LifecycleState::Ready => return Ok(()),
                        LifecycleState::Error => {
                            let reason = self
                                .error_reason
                                .lock()
                                .await
                                .clone()
                                .unwrap_or_else(|| "dictionary load failed".to_string());
                            return Err(LoadError::Unavailable(reason));
                        }
                        _ => {}
                    }
                    if state_rx.changed().await.is_err() {
                        return Err(LoadError::Unavailable("lookup worker is gone".to_string()));
                    }
                }
            })
            .await
            .clone()
    }

    /// Look up a term. Empty queries resolve empty without touching the
    /// worker; an unanswered query resolves empty once the timeout elapses,
    /// so callers never hang on a lookup.
    pub async fn search(&self, query: &str) -> Result<Vec<LookupResult>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let (resolver, response) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.entry(query.to_string()).or_default().push(Waiter {
                token,
                resolver,
                inserted_at: Instant::now(),
            });
        }

        let request = WorkerRequest::Search {
            query: query.to_string(),
        };
        if self.requests.send(request).await.is_err() {
            self.remove_waiter(query, token).await;
            return Err(SearchError::WorkerGone(
                "request channel closed".to_string(),
            ));
        }

        match tokio::time::timeout(self.search_timeout, response).await {
            Ok(Ok(Ok(entries))) => Ok(self.shape(entries)),
            Ok(Ok(Err(e))) => Err(e),
            // Dispatcher went away mid-flight; degrade to no results
            Ok(Err(_)) => Ok(Vec::new()),
            Err(_) => {
                if let Some(waiter) = self.remove_waiter(query, token).await {
                    tracing::debug!(
                        %query,
                        waited_ms = waiter.inserted_at.elapsed().as_millis() as u64,
                        "search timed out, resolving empty"
                    );
                }
                Ok(Vec::new())
            }
        }
    }

    fn shape(&self, entries: Vec<DictionaryEntry>) -> Vec<LookupResult> {
        entries
            .iter()
            .take(self.max_results)
            .map(LookupResult::from_entry)
            .collect()
    }

    async fn remove_waiter(&self, query: &str, token: u64) -> Option<Waiter> {
        let mut pending = self.pending.lock().await;
        let waiters = pending.get_mut(query)?;
        let position = waiters.iter().position(|w| w.token == token)?;
        let waiter = waiters.remove(position);
        if waiters.is_empty() {
            pending.remove(query);
        }
        Some(waiter)
    }
}

impl Drop for Lookup {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Correlates worker events back to pending callers. Responses with no
/// matching waiter (typically after a timeout) are dropped.
async fn dispatch(
    events: AsyncReceiver<WorkerEvent>,
    pending: Arc<Mutex<PendingTable>>,
    state_tx: watch::Sender<LifecycleState>,
    error_reason: Arc<Mutex<Option<String>>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            event = events.recv() => {
                let Ok(event) = event else { break };
                match event {
                    WorkerEvent::Ready => {
                        let _ = state_tx.send(LifecycleState::Ready);
                    }
                    WorkerEvent::Error { reason } => {
                        *error_reason.lock().await = Some(reason);
                        let _ = state_tx.send(LifecycleState::Error);
                    }
                    WorkerEvent::Result { query, entries } => {
                        let waiters = pending.lock().await.remove(&query).unwrap_or_default();
                        if waiters.is_empty() {
                            tracing::debug!(%query, "dropping response with no pending waiters");
                            continue;
                        }
                        for waiter in waiters {
                            let _ = waiter.resolver.send(Ok(entries.clone()));
                        }
                    }
                    WorkerEvent::Failed { query, reason } => {
                        let waiters = pending.lock().await.remove(&query).unwrap_or_default();
                        for waiter in waiters {
                            let _ = waiter.resolver.send(Err(SearchError::from(reason)));
                        }
                    }
                }
            }
        }
    }
}
