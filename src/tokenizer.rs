use crate::document::Document;
use regex::Regex;

lazy_static::lazy_static! {
    static ref HTML_ENTITY: Regex = Regex::new(r"&\w+;").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();
}

/// Splits document text into lowercase word tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Body text of the whole corpus: title before description, documents in order
    pub fn corpus_text(&self, documents: &[Document]) -> String {
        documents
            .iter()
            .map(Document::searchable_text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Strip entities and punctuation, then lowercase
    pub fn sanitize(&self, text: &str) -> String {
        let text = HTML_ENTITY.replace_all(text, "");
        let text = NON_WORD.replace_all(&text, "");
        text.to_lowercase()
    }

    /// Full analysis pipeline
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.sanitize(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Hello, World! This is a test.");
        assert_eq!(tokens, vec!["hello", "world", "this", "is", "a", "test"]);
    }

    #[test]
    fn test_strips_entities_and_punctuation() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Rock &amp; Roll &quot;LIVE&quot; don't-stop");
        assert_eq!(tokens, vec!["rock", "roll", "live", "dontstop"]);
    }

    #[test]
    fn test_keeps_unicode_words() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.tokenize("Café_bar  naïve\n\tüber"),
            vec!["café_bar", "naïve", "über"]
        );
    }

    #[test]
    fn test_corpus_text_order() {
        let tokenizer = Tokenizer::new();
        let docs = vec![
            Document::new("1".into(), "first".into(), "one".into()),
            Document::new("2".into(), "second".into(), "two".into()),
        ];
        assert_eq!(tokenizer.corpus_text(&docs), "first one second two");
        assert!(tokenizer.tokenize(&tokenizer.corpus_text(&[])).is_empty());
    }
}
