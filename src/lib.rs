// Re-export main components
pub mod api;
pub mod config;
pub mod document;
pub mod engine;
pub mod enrich;
pub mod filter;
pub mod language;
pub mod ngram;
pub mod ranking;
pub mod reach;
pub mod scoring;
pub mod stopwords;
pub mod tokenizer;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use document::{Corpus, Document, FetchError, RawRecord, VideoListing, VideoRecord};
pub use engine::{KeywordEngine, Stage};
pub use enrich::{collect_corpus, CatalogSource, DetailsSource};
pub use language::{LanguageDetector, WhatlangDetector};
pub use reach::TagReach;
pub use scoring::ScoredKeyword;
pub use stopwords::StopWords;
pub use tokenizer::Tokenizer;

// Re-export error types
pub use anyhow::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
