use lindera::dictionary::{DictionaryKind, load_embedded_dictionary};
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;
use lindera::tokenizer::Tokenizer;
use thiserror::Error;

use crate::preprocess::preprocess;

/// POS categories that never make a useful lookup key: particles, auxiliary
/// verbs, symbols/punctuation
const SKIP_POS: &[&str] = &["助詞", "助動詞", "記号"];

/// IPADIC puts the dictionary base form at detail index 6
const BASE_FORM_INDEX: usize = 6;

/// IPADIC marks fields it has no value for with an asterisk
const UNKNOWN_MARKER: &str = "*";

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("tokenizer initialization failed: {0}")]
    Init(String),

    #[error("tokenization failed: {0}")]
    Tokenize(String),
}

/// Maps an inflected surface selection to the dictionary citation form the
/// search index is keyed by.
pub struct JapaneseNormalizer {
    tokenizer: Tokenizer,
}

impl JapaneseNormalizer {
    /// Build a normalizer over the embedded IPADIC dictionary
    pub fn new() -> Result<Self, TokenizeError> {
        let dictionary = load_embedded_dictionary(DictionaryKind::IPADIC)
            .map_err(|e| TokenizeError::Init(e.to_string()))?;
        let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
        let tokenizer = Tokenizer::new(segmenter);
        Ok(Self { tokenizer })
    }

    /// Resolve a raw selection to a base-form query. `Ok(None)` means no
    /// token survived filtering; callers fall back to the raw text.
    pub fn normalize(&self, raw: &str) -> Result<Option<String>, TokenizeError> {
        let text = preprocess(raw);
        if text.is_empty() {
            return Ok(None);
        }

        let mut tokens = self
            .tokenizer
            .tokenize(&text)
            .map_err(|e| TokenizeError::Tokenize(e.to_string()))?;

        for token in tokens.iter_mut() {
            let surface = token.surface.to_string();
            let details = token.details();
            if details.is_empty() {
                continue;
            }

            let pos = details[0];
            if SKIP_POS.contains(&pos) {
                continue;
            }

            // Out-of-vocabulary tokens carry no base form; skip them so the
            // caller falls back to the raw selection
            let base_form = if details.len() > BASE_FORM_INDEX {
                details[BASE_FORM_INDEX]
            } else {
                UNKNOWN_MARKER
            };
            if base_form.is_empty() || base_form == UNKNOWN_MARKER {
                continue;
            }

            tracing::debug!(%surface, %pos, %base_form, "normalized selection");
            return Ok(Some(base_form.to_string()));
        }

        Ok(None)
    }
}
