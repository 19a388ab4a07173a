use crate::document::Document;
use serde::Serialize;
use std::collections::HashMap;

/// A unigram or tag string eligible for scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateTerm {
    pub text: String,
    pub raw_frequency: usize,
}

/// Term -> frequency mapping that remembers first-seen order
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    terms: Vec<CandidateTerm>,
    positions: HashMap<String, usize>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count unigram occurrences
    pub fn from_tokens(tokens: &[String]) -> Self {
        let mut set = Self::new();
        for token in tokens {
            set.add(token, 1);
        }
        set
    }

    /// Merge every document's tags in with `weight` per occurrence
    pub fn add_tags(&mut self, documents: &[Document], weight: usize) {
        for doc in documents {
            for tag in &doc.tags {
                let tag = tag.trim().to_lowercase();
                if !tag.is_empty() {
                    self.add(&tag, weight);
                }
            }
        }
    }

    fn add(&mut self, text: &str, weight: usize) {
        match self.positions.get(text) {
            Some(&pos) => self.terms[pos].raw_frequency += weight,
            None => {
                self.positions.insert(text.to_string(), self.terms.len());
                self.terms.push(CandidateTerm {
                    text: text.to_string(),
                    raw_frequency: weight,
                });
            }
        }
    }

    pub fn get(&self, text: &str) -> Option<&CandidateTerm> {
        self.positions.get(text).map(|&pos| &self.terms[pos])
    }

    /// Sum of raw frequencies over every candidate
    pub fn total_mass(&self) -> usize {
        self.terms.iter().map(|t| t.raw_frequency).sum()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateTerm> {
        self.terms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_counts_in_first_seen_order() {
        let set = CandidateSet::from_tokens(&tokens(&["b", "a", "b", "c", "b"]));
        let texts: Vec<_> = set.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "a", "c"]);
        assert_eq!(set.get("b").unwrap().raw_frequency, 3);
        assert_eq!(set.total_mass(), 5);
    }

    #[test]
    fn test_tags_add_weighted_bonus() {
        let mut set = CandidateSet::from_tokens(&tokens(&["cricket", "today"]));
        let docs = vec![
            Document::new("1".into(), String::new(), String::new())
                .with_tags([" Cricket ", "Sports", ""]),
            Document::new("2".into(), String::new(), String::new()).with_tags(["cricket"]),
        ];
        set.add_tags(&docs, 3);

        assert_eq!(set.get("cricket").unwrap().raw_frequency, 7);
        assert_eq!(set.get("sports").unwrap().raw_frequency, 3);
        assert!(set.get("").is_none());
        assert_eq!(set.len(), 3);
    }
}
