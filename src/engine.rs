use crate::config::PipelineConfig;
use crate::document::{Corpus, Document};
use crate::filter::TermFilter;
use crate::language::LanguageDetector;
use crate::ngram::CandidateSet;
use crate::ranking::rank;
use crate::reach::{rank_by_reach, TagReach};
use crate::scoring::{ScoredKeyword, Scorer};
use crate::stopwords::StopWords;
use crate::tokenizer::Tokenizer;
use std::fmt;
use std::sync::Arc;

/// Pipeline stage, logged as a run progresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Ingesting,
    Tokenizing,
    Scoring,
    Ranked,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Ingesting => "ingesting",
            Stage::Tokenizing => "tokenizing",
            Stage::Scoring => "scoring",
            Stage::Ranked => "ranked",
        };
        f.write_str(name)
    }
}

/// Keyword ranking engine.
///
/// Holds only immutable configuration; every call builds its own
/// intermediate structures, so one engine can serve concurrent requests.
pub struct KeywordEngine {
    config: PipelineConfig,
    stopwords: StopWords,
    detector: Arc<dyn LanguageDetector>,
    tokenizer: Tokenizer,
}

impl KeywordEngine {
    /// Create an engine using the `whatlang` detector described by `config`
    pub fn new(config: PipelineConfig) -> Self {
        let detector = Arc::new(config.build_detector());
        Self::with_detector(config, detector)
    }

    pub fn with_detector(config: PipelineConfig, detector: Arc<dyn LanguageDetector>) -> Self {
        Self {
            stopwords: config.build_stopwords(),
            config,
            detector,
            tokenizer: Tokenizer::new(),
        }
    }

    /// Replace the stopword set; the config's `extra_stopwords` still apply
    pub fn with_stopwords(mut self, mut stopwords: StopWords) -> Self {
        stopwords.extend(&self.config.extra_stopwords);
        self.stopwords = stopwords;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Rank keyword candidates of `corpus`, best first
    pub fn rank(&self, corpus: &Corpus) -> Vec<ScoredKeyword> {
        self.rank_top(corpus, self.config.top_n)
    }

    /// Like [`rank`](Self::rank) with an explicit cutoff
    pub fn rank_top(&self, corpus: &Corpus, top_n: usize) -> Vec<ScoredKeyword> {
        tracing::debug!(
            stage = %Stage::Ingesting,
            documents = corpus.len(),
            seed = %corpus.seed
        );
        if corpus.is_empty() {
            tracing::debug!(stage = %Stage::Idle, "Empty corpus");
            return Vec::new();
        }

        tracing::debug!(stage = %Stage::Tokenizing);
        let tokens = self.tokenizer.tokenize(&self.tokenizer.corpus_text(&corpus.documents));
        let mut candidates = CandidateSet::from_tokens(&tokens);
        candidates.add_tags(&corpus.documents, self.config.tag_weight);

        let scoped = self.detector.scoped(&corpus.documents, &corpus.language);
        let detector = scoped.as_deref().unwrap_or(&*self.detector);
        let filter = TermFilter::new(&self.stopwords, detector, self.config.min_term_length);
        let survivors = filter.apply(&candidates, &corpus.language);
        tracing::debug!(
            stage = %Stage::Scoring,
            tokens = tokens.len(),
            candidates = candidates.len(),
            survivors = survivors.len()
        );

        let scored = Scorer::new(self.config.seed_boost).score(&candidates, &survivors, corpus);
        let ranked = rank(scored, top_n);
        tracing::debug!(stage = %Stage::Ranked, keywords = ranked.len());
        ranked
    }

    /// Rank tags by the average reach of the videos using them
    pub fn rank_by_reach(&self, documents: &[Document]) -> Vec<TagReach> {
        self.rank_by_reach_top(documents, self.config.reach_top_n)
    }

    pub fn rank_by_reach_top(&self, documents: &[Document], top_n: usize) -> Vec<TagReach> {
        rank_by_reach(documents, self.config.reach_min_occurrences, top_n)
    }
}
