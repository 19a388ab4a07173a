use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

lazy_static::lazy_static! {
    static ref DEFAULT_STOPWORDS: Vec<String> = {
        let mut words: Vec<String> = [
            // English function words
            "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
            "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
            "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing",
            "dont", "down", "during", "each", "few", "for", "from", "further", "get", "got",
            "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
            "himself", "his", "how", "i", "if", "im", "in", "into", "is", "it", "its",
            "itself", "just", "me", "more", "most", "my", "myself", "new", "no", "nor",
            "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
            "ourselves", "out", "over", "own", "same", "she", "should", "so", "some",
            "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
            "there", "these", "they", "this", "those", "through", "to", "too", "under",
            "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
            "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
            "yourself", "yourselves",
            // Transliterated Hindi function words
            "hai", "hain", "ka", "ki", "ke", "ko", "se", "mein", "aur", "bhi", "nahi",
            "kya", "ye", "yeh", "wo", "woh", "tha", "thi", "par", "pe", "ek",
            // Link and markup noise
            "http", "https", "www", "com", "org", "net", "html", "bit", "ly",
            // Domain-generic nouns
            "video", "videos", "youtube", "channel", "subscribe", "like", "comment",
            "share", "watch", "shorts", "official",
        ]
        .iter()
        .map(|w| w.to_string())
        .collect();
        // Day-of-month numbers
        words.extend((1..=31).map(|n| n.to_string()));
        words
    };
}

/// Swappable stopword set; words are stored lowercase
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl Default for StopWords {
    fn default() -> Self {
        Self::from_words(DEFAULT_STOPWORDS.iter())
    }
}

impl StopWords {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self {
            words: HashSet::new(),
        };
        set.extend(words);
        set
    }

    /// Load one word per line; blank lines and `#` comments are ignored
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stopword file {}", path.display()))?;
        Ok(Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        ))
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
