use crate::dataset::{DictionaryEntry, Gloss};

/// Gloss types carrying supplementary material rather than a definition;
/// excluded from the shaped definition string.
pub const SUPPLEMENTARY_GLOSS_TYPES: &[&str] = &["explanation", "trademark"];

impl Gloss {
    pub fn is_supplementary(&self) -> bool {
        self.gloss_type
            .as_deref()
            .is_some_and(|t| SUPPLEMENTARY_GLOSS_TYPES.contains(&t))
    }
}

/// Simplified per-entry view handed to the popup layer
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub term: String,
    pub reading: String,
    pub definition: String,
    pub part_of_speech: Option<String>,
}

impl LookupResult {
    /// Shape a raw entry: definition is the first sense's non-supplementary
    /// glosses joined together, part-of-speech the first sense's first tag.
    pub fn from_entry(entry: &DictionaryEntry) -> Self {
        let first_sense = entry.sense.first();

        let definition = first_sense
            .map(|sense| {
                sense
                    .gloss
                    .iter()
                    .filter(|g| !g.is_supplementary())
                    .map(|g| g.text.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .unwrap_or_default();

        let part_of_speech = first_sense.and_then(|s| s.part_of_speech.first()).cloned();

        Self {
            term: entry.headword(),
            reading: entry.primary_reading(),
            definition,
            part_of_speech,
        }
    }
}
