use kanal::{AsyncReceiver, AsyncSender};
use kotoba_types::{LifecycleState, SearchFailure, WorkerEvent, WorkerRequest};
use tokio_util::sync::CancellationToken;

use crate::error::LoadError;
use crate::index::DictionaryIndex;
use crate::loader::DatasetLoader;

/// Channel ends owned by the controller side
pub struct WorkerHandle {
    pub requests: AsyncSender<WorkerRequest>,
    pub events: AsyncReceiver<WorkerEvent>,
}

/// Spawn the lookup worker task. All dictionary state (dataset, index) lives
/// inside the task; the only way in or out is the message channels.
pub fn spawn(
    loader: DatasetLoader,
    expected_version: Option<String>,
    cancel: CancellationToken,
) -> WorkerHandle {
    let (req_tx, req_rx) = kanal::bounded_async(64);
    let (evt_tx, evt_rx) = kanal::bounded_async(256);

    tokio::spawn(run(loader, expected_version, req_rx, evt_tx, cancel));

    WorkerHandle {
        requests: req_tx,
        events: evt_rx,
    }
}

async fn run(
    loader: DatasetLoader,
    expected_version: Option<String>,
    requests: AsyncReceiver<WorkerRequest>,
    events: AsyncSender<WorkerEvent>,
    cancel: CancellationToken,
) {
    let mut state = LifecycleState::Uninitialized;
    let mut index: Option<DictionaryIndex> = None;
    let mut loader = Some(loader);

    // The load runs in its own task so searches arriving mid-load are still
    // answered (with a not-ready failure) instead of queueing behind it.
    let (done_tx, mut done_rx) = tokio::sync::mpsc::channel::<Result<_, LoadError>>(1);

    tracing::debug!("lookup worker started");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            Some(result) = done_rx.recv() => {
                match result {
                    Ok(dataset) => {
                        state = LifecycleState::Indexing;
                        let built = DictionaryIndex::build(dataset);
                        tracing::info!(
                            version = %built.version(),
                            entries = built.entry_count(),
                            keys = built.key_count(),
                            "dictionary index ready"
                        );
                        index = Some(built);
                        state = LifecycleState::Ready;
                        if events.send(WorkerEvent::Ready).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        state = LifecycleState::Error;
                        tracing::error!(error = %e, "dictionary load failed");
                        let reason = e.to_string();
                        if events.send(WorkerEvent::Error { reason }).await.is_err() {
                            break;
                        }
                    }
                }
            }

            request = requests.recv() => {
                let Ok(request) = request else { break };
                match request {
                    WorkerRequest::Load { source_url } => {
                        if state != LifecycleState::Uninitialized {
                            tracing::warn!(?state, "ignoring duplicate load request");
                            continue;
                        }
                        let Some(loader) = loader.take() else {
                            tracing::warn!("load requested but loader already consumed");
                            continue;
                        };
                        state = LifecycleState::Loading;
                        let done_tx = done_tx.clone();
                        let expected = expected_version.clone();
                        tokio::spawn(async move {
                            let result = loader.load(&source_url, expected.as_deref()).await;
                            let _ = done_tx.send(result).await;
                        });
                    }
                    WorkerRequest::Search { query } => {
                        let event = match &index {
                            Some(index) if state == LifecycleState::Ready => {
                                let entries =
                                    index.lookup(&query).into_iter().cloned().collect();
                                WorkerEvent::Result { query, entries }
                            }
                            _ => WorkerEvent::Failed {
                                query,
                                reason: SearchFailure::NotReady { state },
                            },
                        };
                        if events.send(event).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }
    tracing::debug!("lookup worker stopped");
}
