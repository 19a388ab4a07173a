use crate::document::{Corpus, Document};
use crate::filter::FilteredTerm;
use crate::ngram::CandidateSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Scales tf * rarity into a readable range
const SCORE_SCALE: f64 = 100.0;

/// A ranked keyword candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredKeyword {
    pub text: String,
    pub frequency: usize,
    /// Word overlap with the seed keyword, in [0, 1]
    pub relevance: f64,
    pub language: String,
    pub score: f64,
}

/// Corpus-wide aggregates shared by every term of one run
struct CorpusStats<'a> {
    documents: &'a [Document],
    texts: Vec<String>,
    avg_views: f64,
    avg_likes: f64,
}

impl<'a> CorpusStats<'a> {
    fn new(documents: &'a [Document]) -> Self {
        let all: Vec<usize> = (0..documents.len()).collect();
        let (avg_views, avg_likes) = averages(documents, &all);
        Self {
            documents,
            texts: documents.iter().map(Document::containment_text).collect(),
            avg_views,
            avg_likes,
        }
    }

    /// Indices of documents whose text contains `term` as a substring
    fn containing(&self, term: &str) -> Vec<usize> {
        self.texts
            .iter()
            .enumerate()
            .filter(|(_, text)| text.contains(term))
            .map(|(i, _)| i)
            .collect()
    }
}

fn averages(documents: &[Document], subset: &[usize]) -> (f64, f64) {
    if subset.is_empty() {
        return (0.0, 0.0);
    }
    let n = subset.len() as f64;
    let views: f64 = subset.iter().map(|&i| documents[i].view_count as f64).sum();
    let likes: f64 = subset.iter().map(|&i| documents[i].like_count as f64).sum();
    (views / n, likes / n)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Shared words divided by the larger word-set size
pub fn relevance(term: &str, seed: &str) -> f64 {
    let term_words = word_set(term);
    let seed_words = word_set(seed);
    let larger = term_words.len().max(seed_words.len());
    if larger == 0 {
        return 0.0;
    }
    term_words.intersection(&seed_words).count() as f64 / larger as f64
}

/// Smoothed inverse document frequency; always >= 1
pub fn rarity(num_documents: usize, docs_containing: usize) -> f64 {
    ((num_documents as f64 + 1.0) / (docs_containing as f64 + 1.0)).ln() + 1.0
}

/// Combines frequency, rarity, seed match and engagement into one score
#[derive(Debug, Clone)]
pub struct Scorer {
    seed_boost: f64,
}

impl Default for Scorer {
    fn default() -> Self {
        Self { seed_boost: 1.5 }
    }
}

impl Scorer {
    pub fn new(seed_boost: f64) -> Self {
        Self { seed_boost }
    }

    /// Score every surviving term. `candidates` is the pre-filter set and
    /// supplies the tf denominator.
    pub fn score(
        &self,
        candidates: &CandidateSet,
        survivors: &[FilteredTerm],
        corpus: &Corpus,
    ) -> Vec<ScoredKeyword> {
        if corpus.is_empty() {
            return Vec::new();
        }

        let stats = CorpusStats::new(&corpus.documents);
        let total_mass = candidates.total_mass();
        let seed = corpus.seed.trim().to_lowercase();

        survivors
            .iter()
            .map(|filtered| {
                let term = &filtered.term;
                let containing = stats.containing(&term.text);

                let tf = ratio(term.raw_frequency as f64, total_mass as f64);
                let mut score = tf * rarity(corpus.len(), containing.len()) * SCORE_SCALE;

                if !seed.is_empty() && term.text.contains(&seed) {
                    score *= self.seed_boost;
                }

                if !containing.is_empty() {
                    let (views, likes) = averages(stats.documents, &containing);
                    let multiplier =
                        (ratio(views, stats.avg_views) + ratio(likes, stats.avg_likes)) / 2.0;
                    score *= multiplier;
                }

                ScoredKeyword {
                    text: term.text.clone(),
                    frequency: term.raw_frequency,
                    relevance: relevance(&term.text, &seed),
                    language: filtered.language.clone(),
                    score: non_negative(score),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngram::CandidateTerm;

    fn survivor(text: &str, raw_frequency: usize) -> FilteredTerm {
        FilteredTerm {
            term: CandidateTerm {
                text: text.to_string(),
                raw_frequency,
            },
            language: "en".to_string(),
        }
    }

    fn candidates(terms: &[(&str, usize)]) -> CandidateSet {
        let tokens: Vec<String> = terms
            .iter()
            .flat_map(|(t, n)| std::iter::repeat(t.to_string()).take(*n))
            .collect();
        CandidateSet::from_tokens(&tokens)
    }

    #[test]
    fn test_relevance() {
        assert_eq!(relevance("cricket", "cricket"), 1.0);
        assert_eq!(relevance("cricket", "Cricket highlights"), 0.5);
        assert_eq!(relevance("football", "cricket"), 0.0);
        assert_eq!(relevance("cricket", ""), 0.0);
    }

    #[test]
    fn test_rarity_rewards_concentrated_terms() {
        assert!(rarity(10, 1) > rarity(10, 9));
        assert!(rarity(3, 3) >= 1.0);
        assert!(rarity(0, 0).is_finite());
    }

    #[test]
    fn test_seed_boost() {
        // Both terms appear in every document and have the same mass
        let docs = vec![
            Document::new("1".into(), "guitar lesson".into(), String::new()).with_stats(10, 1),
            Document::new("2".into(), "guitar lesson".into(), String::new()).with_stats(20, 2),
        ];
        let corpus = Corpus::new(docs, "guitar", "en");
        let set = candidates(&[("guitar", 2), ("lesson", 2)]);
        let survivors = [survivor("guitar", 2), survivor("lesson", 2)];
        let scored = Scorer::default().score(&set, &survivors, &corpus);

        assert!(scored[0].score > scored[1].score);
        assert!((scored[0].score / scored[1].score - 1.5).abs() < 1e-9);
        assert_eq!(scored[0].relevance, 1.0);
        assert_eq!(scored[1].relevance, 0.0);
    }

    #[test]
    fn test_engagement_multiplier() {
        let docs = vec![
            Document::new("1".into(), "popular".into(), String::new()).with_stats(300, 30),
            Document::new("2".into(), "obscure".into(), String::new()).with_stats(100, 10),
        ];
        let corpus = Corpus::new(docs, "", "en");
        let set = candidates(&[("popular", 1), ("obscure", 1)]);
        let survivors = [survivor("popular", 1), survivor("obscure", 1)];
        let scored = Scorer::default().score(&set, &survivors, &corpus);

        // corpus averages 200/20; popular ratio 1.5, obscure ratio 0.5
        assert!((scored[0].score / scored[1].score - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_engagement_is_finite() {
        let docs = vec![
            Document::new("1".into(), "silent film".into(), String::new()),
            Document::new("2".into(), "silent night".into(), String::new()),
        ];
        let corpus = Corpus::new(docs, "silent", "en");
        let set = candidates(&[("silent", 2), ("film", 1), ("night", 1)]);
        let survivors = [survivor("silent", 2), survivor("film", 1), survivor("night", 1)];

        for keyword in Scorer::default().score(&set, &survivors, &corpus) {
            assert!(keyword.score.is_finite());
            assert!(keyword.score >= 0.0);
        }
    }

    #[test]
    fn test_term_missing_from_documents_keeps_base_score() {
        let docs = vec![Document::new("1".into(), "alpha".into(), String::new()).with_stats(0, 0)];
        let corpus = Corpus::new(docs, "", "en");
        let set = candidates(&[("alpha", 1), ("omega", 1)]);
        let scored = Scorer::default().score(&set, &[survivor("omega", 1)], &corpus);

        // 0.5 * (ln(2 / 1) + 1) * 100
        let expected = 0.5 * (2f64.ln() + 1.0) * 100.0;
        assert!((scored[0].score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = Corpus::new(Vec::new(), "x", "en");
        assert!(Scorer::default()
            .score(&CandidateSet::new(), &[survivor("alpha", 1)], &corpus)
            .is_empty());
    }
}
