use crate::document::Document;
use whatlang::{Detector, Lang};

/// Documents shorter than this are too short to vote on the corpus languages
const MIN_PRIOR_WORDS: usize = 5;

const ISO_639_1: &[(Lang, &str)] = &[
    (Lang::Eng, "en"),
    (Lang::Spa, "es"),
    (Lang::Por, "pt"),
    (Lang::Ita, "it"),
    (Lang::Fra, "fr"),
    (Lang::Deu, "de"),
    (Lang::Nld, "nl"),
    (Lang::Rus, "ru"),
    (Lang::Ukr, "uk"),
    (Lang::Pol, "pl"),
    (Lang::Tur, "tr"),
    (Lang::Swe, "sv"),
    (Lang::Dan, "da"),
    (Lang::Fin, "fi"),
    (Lang::Hin, "hi"),
    (Lang::Ben, "bn"),
    (Lang::Ara, "ar"),
    (Lang::Jpn, "ja"),
    (Lang::Kor, "ko"),
    (Lang::Cmn, "zh"),
    (Lang::Ind, "id"),
    (Lang::Vie, "vi"),
];

fn lang_to_code(lang: Lang) -> &'static str {
    ISO_639_1
        .iter()
        .find(|(l, _)| *l == lang)
        .map(|(_, code)| *code)
        .unwrap_or_else(|| lang.code())
}

fn code_to_lang(code: &str) -> Option<Lang> {
    let code = code.trim().to_lowercase();
    ISO_639_1
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(lang, _)| *lang)
        .or_else(|| Lang::from_code(code))
}

/// Canonical form of a language code: ISO 639-1 where one is known,
/// otherwise the lowercased input ("eng" -> "en", "EN" -> "en").
pub fn normalize_language_code(code: &str) -> String {
    match code_to_lang(code) {
        Some(lang) => lang_to_code(lang).to_string(),
        None => code.trim().to_lowercase(),
    }
}

/// Classifies a single term. `None` means the language could not be determined.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Option<String>;

    /// A detector narrowed to one corpus and target language, or `None` to
    /// keep using `self` for every term of that corpus.
    fn scoped(
        &self,
        _documents: &[Document],
        _target: &str,
    ) -> Option<Box<dyn LanguageDetector>> {
        None
    }
}

/// Trigram based detection backed by `whatlang`.
///
/// A single word carries too few trigrams to choose between dozens of
/// languages, so terms are classified against the corpus languages only:
/// the target plus every language reliably detected in a document's title
/// and description. Ambiguous terms come back as unknown.
pub struct WhatlangDetector {
    detector: Detector,
    languages: Vec<Lang>,
    min_confidence: f64,
}

impl WhatlangDetector {
    pub fn new() -> Self {
        Self {
            detector: Detector::new(),
            languages: Vec::new(),
            min_confidence: 0.0,
        }
    }

    /// Restrict detection to the given languages; unknown codes are ignored
    pub fn with_languages<S: AsRef<str>>(languages: &[S]) -> Self {
        let languages: Vec<Lang> = languages
            .iter()
            .filter_map(|code| code_to_lang(code.as_ref()))
            .collect();
        if languages.is_empty() {
            return Self::new();
        }
        Self {
            detector: Detector::with_allowlist(languages.clone()),
            languages,
            min_confidence: 0.0,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Target language plus languages reliably detected in the documents
    fn corpus_languages(&self, documents: &[Document], target: &str) -> Vec<Lang> {
        let mut languages: Vec<Lang> = code_to_lang(target).into_iter().collect();
        for doc in documents {
            let text = doc.searchable_text();
            if text.split_whitespace().count() < MIN_PRIOR_WORDS {
                continue;
            }
            if let Some(info) = self.detector.detect(&text) {
                if info.is_reliable() && !languages.contains(&info.lang()) {
                    languages.push(info.lang());
                }
            }
        }
        if !self.languages.is_empty() {
            languages.retain(|lang| self.languages.contains(lang));
        }
        languages
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(
    detector: &Detector,
    text: &str,
    candidates: usize,
    min_confidence: f64,
) -> Option<String> {
    let info = detector.detect(text)?;
    // With one candidate there is nothing to be ambiguous between
    if candidates != 1 && (!info.is_reliable() || info.confidence() < min_confidence) {
        return None;
    }
    Some(lang_to_code(info.lang()).to_string())
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        classify(&self.detector, text, self.languages.len(), self.min_confidence)
    }

    fn scoped(
        &self,
        documents: &[Document],
        target: &str,
    ) -> Option<Box<dyn LanguageDetector>> {
        let languages = self.corpus_languages(documents, target);
        tracing::debug!(
            "Term languages for target {:?}: {:?}",
            target,
            languages.iter().map(|l| lang_to_code(*l)).collect::<Vec<_>>()
        );
        Some(Box::new(CorpusDetector {
            detector: Detector::with_allowlist(languages.clone()),
            languages,
            min_confidence: self.min_confidence,
        }))
    }
}

/// Term detector limited to the languages of one corpus
struct CorpusDetector {
    detector: Detector,
    languages: Vec<Lang>,
    min_confidence: f64,
}

impl LanguageDetector for CorpusDetector {
    fn detect(&self, text: &str) -> Option<String> {
        if self.languages.is_empty() {
            return None;
        }
        classify(&self.detector, text, self.languages.len(), self.min_confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENGLISH: &str = "The quick brown fox jumps over the lazy dog and then keeps \
        running through the green field until the sun goes down behind the hills";
    const GERMAN: &str = "Der schnelle braune Fuchs springt über den faulen Hund und \
        läuft danach durch das grüne Feld, bis die Sonne hinter den Bergen untergeht";

    fn doc(title: &str, description: &str) -> Document {
        Document::new("1".into(), title.into(), description.into())
    }

    #[test]
    fn test_normalize_language_code() {
        assert_eq!(normalize_language_code("en"), "en");
        assert_eq!(normalize_language_code(" EN "), "en");
        assert_eq!(normalize_language_code("eng"), "en");
        assert_eq!(normalize_language_code("deu"), "de");
        assert_eq!(normalize_language_code("xx"), "xx");
    }

    #[test]
    fn test_detects_english_sentence() {
        let detector = WhatlangDetector::new();
        assert_eq!(detector.detect(ENGLISH).as_deref(), Some("en"));
    }

    #[test]
    fn test_undetectable_input_is_unknown() {
        let detector = WhatlangDetector::new();
        assert_eq!(detector.detect(""), None);
        assert_eq!(detector.detect("12345"), None);
    }

    #[test]
    fn test_confidence_threshold() {
        let detector = WhatlangDetector::new().with_min_confidence(1.1);
        assert_eq!(detector.detect(ENGLISH), None);
    }

    #[test]
    fn test_short_documents_leave_only_the_target() {
        let detector = WhatlangDetector::new();
        let docs = [doc("cricket highlights today", "")];
        assert_eq!(detector.corpus_languages(&docs, "en"), vec![Lang::Eng]);
    }

    #[test]
    fn test_corpus_languages_include_reliable_documents() {
        let detector = WhatlangDetector::new();
        let docs = [doc("Fuchs", GERMAN), doc("Fox", ENGLISH)];
        let languages = detector.corpus_languages(&docs, "de");
        assert_eq!(languages[0], Lang::Deu);
        assert!(languages.contains(&Lang::Eng));
    }

    #[test]
    fn test_corpus_languages_stay_within_configured() {
        let detector = WhatlangDetector::with_languages(&["en"]);
        let docs = [doc("Fuchs", GERMAN)];
        assert_eq!(detector.corpus_languages(&docs, "en"), vec![Lang::Eng]);
        assert!(!detector.corpus_languages(&docs, "de").contains(&Lang::Deu));
    }

    #[test]
    fn test_scoped_single_words_in_target_language() {
        let detector = WhatlangDetector::new();
        let docs = [doc("cricket highlights today", "")];
        let scoped = detector.scoped(&docs, "en").unwrap();
        for word in ["cricket", "highlights", "today", "sports"] {
            assert_eq!(scoped.detect(word).as_deref(), Some("en"), "{word}");
        }
        assert_eq!(scoped.detect("2024"), None);
    }

    #[test]
    fn test_scoped_rejects_other_scripts() {
        let detector = WhatlangDetector::new();
        let docs = [doc("cricket highlights today", "")];

        let scoped = detector.scoped(&docs, "ru").unwrap();
        assert_eq!(scoped.detect("cricket"), None);

        let scoped = detector.scoped(&docs, "en").unwrap();
        assert_eq!(scoped.detect("крикет"), None);
    }

    #[test]
    fn test_scoped_unknown_target_detects_nothing() {
        let detector = WhatlangDetector::new();
        let scoped = detector.scoped(&[doc("short", "")], "xx").unwrap();
        assert_eq!(scoped.detect("cricket"), None);
    }
}
