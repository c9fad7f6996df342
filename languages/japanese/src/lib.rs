pub mod normalizer;
pub mod preprocess;

pub use normalizer::{JapaneseNormalizer, TokenizeError};
pub use preprocess::preprocess;
