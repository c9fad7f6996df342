use serde::{Deserialize, Serialize};

/// One kanji spelling of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanjiForm {
    pub text: String,
    #[serde(default)]
    pub common: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One kana reading of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanaForm {
    pub text: String,
    #[serde(default)]
    pub common: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gloss {
    pub text: String,
    /// Gloss classification ("explanation", "trademark", ...); absent for plain definitions
    #[serde(rename = "type", default)]
    pub gloss_type: Option<String>,
}

/// One meaning grouping with its own part-of-speech tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    #[serde(rename = "partOfSpeech", default)]
    pub part_of_speech: Vec<String>,
    #[serde(default)]
    pub gloss: Vec<Gloss>,
}

/// One dictionary headword with all its forms and senses.
/// Field names follow the jmdict-simplified JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub id: String,
    #[serde(default)]
    pub kanji: Vec<KanjiForm>,
    #[serde(default)]
    pub kana: Vec<KanaForm>,
    #[serde(default)]
    pub sense: Vec<Sense>,
}

impl DictionaryEntry {
    /// Main headword: first kanji form, else first kana form
    pub fn headword(&self) -> String {
        self.kanji
            .first()
            .map(|k| k.text.clone())
            .or_else(|| self.kana.first().map(|k| k.text.clone()))
            .unwrap_or_default()
    }

    /// Primary reading: first kana form
    pub fn primary_reading(&self) -> String {
        self.kana.first().map(|k| k.text.clone()).unwrap_or_default()
    }

    /// Every surface form this entry is indexable under, kanji first
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        self.kanji
            .iter()
            .map(|k| k.text.as_str())
            .chain(self.kana.iter().map(|k| k.text.as_str()))
    }
}

/// The versioned dataset payload as fetched from the remote source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryDataset {
    pub version: String,
    #[serde(default)]
    pub entries: Vec<DictionaryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_jmdict_simplified_payload() {
        let json = r#"{
            "version": "3.5.0",
            "entries": [
                {
                    "id": "1358280",
                    "kanji": [{"text": "食べる", "common": true, "tags": []}],
                    "kana": [{"text": "たべる", "common": true}],
                    "sense": [
                        {
                            "partOfSpeech": ["v1", "vt"],
                            "gloss": [
                                {"text": "to eat"},
                                {"text": "figurative use", "type": "explanation"}
                            ]
                        }
                    ]
                }
            ]
        }"#;

        let dataset: DictionaryDataset = serde_json::from_str(json).expect("parse failed");
        assert_eq!(dataset.version, "3.5.0");
        assert_eq!(dataset.entries.len(), 1);

        let entry = &dataset.entries[0];
        assert_eq!(entry.headword(), "食べる");
        assert_eq!(entry.primary_reading(), "たべる");
        assert_eq!(entry.forms().collect::<Vec<_>>(), vec!["食べる", "たべる"]);
        assert_eq!(
            entry.sense[0].gloss[1].gloss_type.as_deref(),
            Some("explanation")
        );
    }

    #[test]
    fn headword_falls_back_to_kana() {
        let entry = DictionaryEntry {
            id: "1".to_string(),
            kanji: vec![],
            kana: vec![KanaForm {
                text: "すし".to_string(),
                common: true,
                tags: vec![],
            }],
            sense: vec![],
        };
        assert_eq!(entry.headword(), "すし");
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"id": "42", "sense": [{"gloss": [{"text": "thing"}]}]}"#;
        let entry: DictionaryEntry = serde_json::from_str(json).expect("parse failed");
        assert!(entry.kanji.is_empty());
        assert!(entry.kana.is_empty());
        assert!(entry.sense[0].part_of_speech.is_empty());
        assert_eq!(entry.headword(), "");
    }
}
