use crate::language::{normalize_language_code, LanguageDetector};
use crate::ngram::{CandidateSet, CandidateTerm};
use crate::stopwords::StopWords;

/// A candidate that passed every filter, with its detected language
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredTerm {
    pub term: CandidateTerm,
    pub language: String,
}

/// Drops stopwords, short terms, phrases and terms outside the target language
pub struct TermFilter<'a> {
    stopwords: &'a StopWords,
    detector: &'a dyn LanguageDetector,
    min_term_length: usize,
}

impl<'a> TermFilter<'a> {
    pub fn new(
        stopwords: &'a StopWords,
        detector: &'a dyn LanguageDetector,
        min_term_length: usize,
    ) -> Self {
        Self {
            stopwords,
            detector,
            min_term_length,
        }
    }

    /// Cheap structural checks, run before language detection
    fn passes_lexical(&self, term: &str) -> bool {
        !self.stopwords.contains(term)
            && term.chars().count() >= self.min_term_length
            && !term.chars().any(char::is_whitespace)
    }

    /// Detected language of `term` if it passes every condition
    pub fn check(&self, term: &str, language: &str) -> Option<String> {
        if !self.passes_lexical(term) {
            return None;
        }
        let detected = normalize_language_code(&self.detector.detect(term)?);
        (detected == normalize_language_code(language)).then_some(detected)
    }

    pub fn passes(&self, term: &str, language: &str) -> bool {
        self.check(term, language).is_some()
    }

    /// Surviving candidates, in first-seen order
    pub fn apply(&self, candidates: &CandidateSet, language: &str) -> Vec<FilteredTerm> {
        candidates
            .iter()
            .filter_map(|term| {
                let language = self.check(&term.text, language)?;
                Some(FilteredTerm {
                    term: term.clone(),
                    language,
                })
            })
            .collect()
    }
}
