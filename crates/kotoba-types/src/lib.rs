pub mod dataset;
pub mod protocol;
pub mod view;

pub use dataset::{DictionaryDataset, DictionaryEntry, Gloss, KanaForm, KanjiForm, Sense};
pub use protocol::{LifecycleState, SearchFailure, WorkerEvent, WorkerRequest};
pub use view::LookupResult;
