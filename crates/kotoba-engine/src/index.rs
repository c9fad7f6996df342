use std::collections::HashMap;

use kotoba_types::{DictionaryDataset, DictionaryEntry};

/// Exact-match index over every kanji and kana form of every entry.
/// Built once per worker instance and read-only afterwards.
pub struct DictionaryIndex {
    version: String,
    entries: Vec<DictionaryEntry>,
    buckets: HashMap<String, Vec<usize>>,
}

impl DictionaryIndex {
    /// Single pass over (entry x form). A form's key is its case-folded
    /// text; an entry lands at most once in any bucket.
    pub fn build(dataset: DictionaryDataset) -> Self {
        let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();

        for (position, entry) in dataset.entries.iter().enumerate() {
            for form in entry.forms() {
                let key = form.to_lowercase();
                let bucket = buckets.entry(key).or_default();
                if !bucket.contains(&position) {
                    bucket.push(position);
                }
            }
        }

        Self {
            version: dataset.version,
            entries: dataset.entries,
            buckets,
        }
    }

    pub fn lookup(&self, query: &str) -> Vec<&DictionaryEntry> {
        let key = query.to_lowercase();
        match self.buckets.get(&key) {
            Some(bucket) => bucket
                .iter()
                .filter_map(|&position| self.entries.get(position))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kotoba_types::{KanaForm, KanjiForm};

    fn kanji(text: &str) -> KanjiForm {
        KanjiForm {
            text: text.to_string(),
            common: false,
            tags: vec![],
        }
    }

    fn kana(text: &str) -> KanaForm {
        KanaForm {
            text: text.to_string(),
            common: false,
            tags: vec![],
        }
    }

    fn entry(id: &str, kanji_forms: &[&str], kana_forms: &[&str]) -> DictionaryEntry {
        DictionaryEntry {
            id: id.to_string(),
            kanji: kanji_forms.iter().map(|t| kanji(t)).collect(),
            kana: kana_forms.iter().map(|t| kana(t)).collect(),
            sense: vec![],
        }
    }

    fn build(entries: Vec<DictionaryEntry>) -> DictionaryIndex {
        DictionaryIndex::build(DictionaryDataset {
            version: "test".to_string(),
            entries,
        })
    }

    #[test]
    fn every_declared_form_resolves_to_its_entry() {
        let index = build(vec![
            entry("1", &["食べる"], &["たべる"]),
            entry("2", &["飲む"], &["のむ"]),
        ]);

        for form in ["食べる", "たべる"] {
            let hits = index.lookup(form);
            assert_eq!(hits.len(), 1, "form {form}");
            assert_eq!(hits[0].id, "1");
        }
        assert_eq!(index.lookup("飲む")[0].id, "2");
        assert_eq!(index.lookup("のむ")[0].id, "2");
    }

    #[test]
    fn entry_with_three_forms_lands_under_exactly_three_keys() {
        let index = build(vec![entry("1", &["早い", "速い"], &["はやい"])]);

        assert_eq!(index.key_count(), 3);
        for form in ["早い", "速い", "はやい"] {
            let hits = index.lookup(form);
            assert_eq!(hits.len(), 1, "form {form}");
            assert_eq!(hits[0].id, "1");
        }
    }

    #[test]
    fn forms_folding_to_the_same_key_are_deduped() {
        // Latin-script entry whose kanji and kana fields fold to one key
        let index = build(vec![entry("1", &["Tシャツ"], &["tシャツ"])]);

        let hits = index.lookup("tシャツ");
        assert_eq!(hits.len(), 1);
        assert_eq!(index.lookup("Tシャツ").len(), 1);
    }

    #[test]
    fn lookup_is_case_folded() {
        let index = build(vec![entry("1", &["CD"], &[])]);
        assert_eq!(index.lookup("cd").len(), 1);
        assert_eq!(index.lookup("CD").len(), 1);
    }

    #[test]
    fn unknown_key_returns_empty() {
        let index = build(vec![entry("1", &["食べる"], &["たべる"])]);
        assert!(index.lookup("のむ").is_empty());
    }

    #[test]
    fn shared_form_buckets_keep_dataset_order() {
        let index = build(vec![
            entry("1", &[], &["かみ"]),
            entry("2", &["神"], &["かみ"]),
            entry("3", &["紙"], &["かみ"]),
        ]);

        let ids: Vec<_> = index.lookup("かみ").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
