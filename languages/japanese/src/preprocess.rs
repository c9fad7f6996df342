use unicode_normalization::UnicodeNormalization;

/// Clean a raw text selection before tokenization: NFKC normalization so
/// full-width/half-width variants collapse, embedded line breaks removed.
pub fn preprocess(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let text: String = text.nfkc().collect();
    text.replace(['\n', '\r'], "").trim().to_string()
}
