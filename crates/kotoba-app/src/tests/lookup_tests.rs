use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kotoba_config::Config;
use kotoba_engine::{DatasetFetcher, LoadError, Lookup, SearchError};
use kotoba_types::{
    DictionaryDataset, DictionaryEntry, Gloss, KanaForm, KanjiForm, Sense,
};
use tokio::task::JoinSet;
use tokio::time::timeout;

pub(super) fn taberu_dataset() -> DictionaryDataset {
    DictionaryDataset {
        version: "v1".to_string(),
        entries: vec![DictionaryEntry {
            id: "1".to_string(),
            kanji: vec![KanjiForm {
                text: "食べる".to_string(),
                common: true,
                tags: vec![],
            }],
            kana: vec![KanaForm {
                text: "たべる".to_string(),
                common: true,
                tags: vec![],
            }],
            sense: vec![Sense {
                part_of_speech: vec!["v1".to_string()],
                gloss: vec![Gloss {
                    text: "to eat".to_string(),
                    gloss_type: None,
                }],
            }],
        }],
    }
}

pub(super) struct CountingFetcher {
    dataset: DictionaryDataset,
    pub calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn new(dataset: DictionaryDataset) -> Self {
        Self {
            dataset,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DatasetFetcher for CountingFetcher {
    async fn fetch(&self, _url: &str) -> Result<DictionaryDataset, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.dataset.clone())
    }
}

struct BrokenFetcher;

#[async_trait]
impl DatasetFetcher for BrokenFetcher {
    async fn fetch(&self, _url: &str) -> Result<DictionaryDataset, LoadError> {
        Err(LoadError::Fetch("connection refused".to_string()))
    }
}

pub(super) fn test_config() -> Config {
    let mut config = Config::new();
    config.cache.enabled = false;
    config.lookup.search_timeout_ms = 2000;
    config.lookup.max_results = 5;
    config
}

fn engine_with(fetcher: Arc<dyn DatasetFetcher>) -> Lookup {
    Lookup::with_parts(&test_config(), None, fetcher)
}

#[tokio::test]
async fn end_to_end_scenario_from_dataset_to_shaped_results() {
    let lookup = engine_with(Arc::new(CountingFetcher::new(taberu_dataset())));
    lookup.ensure_ready().await.expect("init");

    for query in ["食べる", "たべる"] {
        let results = lookup.search(query).await.expect("search");
        assert_eq!(results.len(), 1, "query {query}");
        assert_eq!(results[0].term, "食べる");
        assert_eq!(results[0].reading, "たべる");
        assert_eq!(results[0].definition, "to eat");
        assert_eq!(results[0].part_of_speech.as_deref(), Some("v1"));
    }

    let results = lookup.search("のむ").await.expect("search");
    assert!(results.is_empty());
}

#[tokio::test]
async fn search_before_initialization_fails_with_not_ready() {
    let lookup = engine_with(Arc::new(CountingFetcher::new(taberu_dataset())));

    let err = lookup.search("食べる").await.expect_err("must fail");
    assert!(matches!(err, SearchError::NotReady { .. }));
}

#[tokio::test]
async fn concurrent_initialization_coalesces_to_one_load() {
    let fetcher = Arc::new(CountingFetcher::new(taberu_dataset()));
    let lookup = Arc::new(engine_with(fetcher.clone()));

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let lookup = lookup.clone();
        tasks.spawn(async move { lookup.ensure_ready().await });
    }
    while let Some(result) = tasks.join_next().await {
        result.expect("task").expect("init");
    }

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

    // Already ready: resolves immediately without another load
    lookup.ensure_ready().await.expect("init");
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_identical_queries_all_resolve() {
    let lookup = Arc::new(engine_with(Arc::new(CountingFetcher::new(
        taberu_dataset(),
    ))));
    lookup.ensure_ready().await.expect("init");

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let lookup = lookup.clone();
        tasks.spawn(async move { lookup.search("たべる").await });
    }

    let mut resolved = 0;
    while let Some(result) = tasks.join_next().await {
        let results = result.expect("task").expect("search");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].term, "食べる");
        resolved += 1;
    }
    assert_eq!(resolved, 8);
}

#[tokio::test]
async fn load_failure_rejects_initialization_and_stays_terminal() {
    let lookup = engine_with(Arc::new(BrokenFetcher));

    let first = lookup.ensure_ready().await.expect_err("must fail");
    assert!(matches!(first, LoadError::Unavailable(_)));

    // Terminal: the same failure, no retry
    let second = lookup.ensure_ready().await.expect_err("must fail");
    assert_eq!(first, second);

    let err = lookup.search("食べる").await.expect_err("must fail");
    assert!(matches!(err, SearchError::NotReady { .. }));
}

#[tokio::test]
async fn results_are_capped_at_max_results() {
    let entries = (0..10)
        .map(|i| DictionaryEntry {
            id: i.to_string(),
            kanji: vec![],
            kana: vec![KanaForm {
                text: "かき".to_string(),
                common: false,
                tags: vec![],
            }],
            sense: vec![],
        })
        .collect();
    let dataset = DictionaryDataset {
        version: "v1".to_string(),
        entries,
    };

    let lookup = engine_with(Arc::new(CountingFetcher::new(dataset)));
    lookup.ensure_ready().await.expect("init");

    let results = timeout(Duration::from_secs(2), lookup.search("かき"))
        .await
        .expect("deadline")
        .expect("search");
    assert_eq!(results.len(), 5);
}
