use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// A single video's text and engagement statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
}

impl Document {
    pub fn new(id: String, title: String, description: String) -> Self {
        Self {
            id,
            title,
            description,
            tags: Vec::new(),
            view_count: 0,
            like_count: 0,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stats(mut self, view_count: u64, like_count: u64) -> Self {
        self.view_count = view_count;
        self.like_count = like_count;
        self
    }

    /// Body text (title + description)
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    /// Lowercased title, description and tags, used for substring containment
    pub fn containment_text(&self) -> String {
        let mut text = self.searchable_text();
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        text.to_lowercase()
    }
}

/// Documents plus the seed keyword and target language of one ranking request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    pub documents: Vec<Document>,
    pub seed: String,
    pub language: String,
}

impl Corpus {
    pub fn new(
        documents: Vec<Document>,
        seed: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            documents,
            seed: seed.into(),
            language: language.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

/// Failure signal of a per-document details lookup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("video '{0}' not found")]
    NotFound(String),
    #[error("video '{id}' is missing {field}")]
    Incomplete { id: String, field: &'static str },
    #[error("video '{id}' has an invalid {field}: {value:?}")]
    InvalidCount {
        id: String,
        field: &'static str,
        value: String,
    },
    #[error("video '{id}' is malformed: {reason}")]
    Malformed { id: String, reason: String },
    #[error("lookup for video '{0}' timed out")]
    Timeout(String),
}

// ========== Wire format ==========

/// Video identifier, either bare or nested as returned by search listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VideoId {
    Plain(String),
    Nested {
        #[serde(rename = "videoId")]
        video_id: String,
    },
}

impl VideoId {
    pub fn as_str(&self) -> &str {
        match self {
            VideoId::Plain(id) => id,
            VideoId::Nested { video_id } => video_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Statistic counts arrive as numbers or as decimal strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Count {
    Number(u64),
    Text(String),
}

impl Count {
    fn parse(&self, id: &str, field: &'static str) -> Result<u64, FetchError> {
        match self {
            Count::Number(n) => Ok(*n),
            Count::Text(s) => s.trim().parse().map_err(|_| FetchError::InvalidCount {
                id: id.to_string(),
                field,
                value: s.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub view_count: Option<Count>,
    #[serde(default)]
    pub like_count: Option<Count>,
}

/// Raw video details as returned by the details lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: VideoId,
    #[serde(default)]
    pub snippet: Option<Snippet>,
    #[serde(default)]
    pub statistics: Option<Statistics>,
}

impl VideoRecord {
    /// Validate the record into an immutable document
    pub fn into_document(self) -> Result<Document, FetchError> {
        let id = self.id.as_str().to_string();
        let snippet = self.snippet.ok_or_else(|| FetchError::Incomplete {
            id: id.clone(),
            field: "snippet",
        })?;
        let statistics = self.statistics.ok_or_else(|| FetchError::Incomplete {
            id: id.clone(),
            field: "statistics",
        })?;

        let view_count = match &statistics.view_count {
            Some(count) => count.parse(&id, "viewCount")?,
            None => {
                return Err(FetchError::Incomplete {
                    id,
                    field: "viewCount",
                })
            }
        };
        // Likes can be hidden by the uploader
        let like_count = match &statistics.like_count {
            Some(count) => count.parse(&id, "likeCount")?,
            None => 0,
        };

        Ok(Document {
            id,
            title: snippet.title,
            description: snippet.description,
            tags: snippet.tags.unwrap_or_default(),
            view_count,
            like_count,
        })
    }
}

/// A listing item held as raw JSON until it is looked up.
///
/// Items are parsed one at a time, so a record with a bad shape fails its
/// own lookup instead of the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(serde_json::Value);

impl RawRecord {
    /// Bare `"id"` or nested `"id": {"videoId": ...}`
    pub fn video_id(&self) -> Option<&str> {
        let id = self.0.get("id")?;
        id.as_str().or_else(|| id.get("videoId")?.as_str())
    }

    pub fn parse(&self) -> Result<VideoRecord, FetchError> {
        serde_json::from_value(self.0.clone()).map_err(|err| FetchError::Malformed {
            id: self.video_id().unwrap_or_default().to_string(),
            reason: err.to_string(),
        })
    }
}

impl From<serde_json::Value> for RawRecord {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Listing payload: `{ "items": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoListing {
    #[serde(default)]
    pub items: Vec<RawRecord>,
}

impl VideoListing {
    /// Load a listing from JSON; `.gz` files are decompressed first
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        let listing = serde_json::from_reader(BufReader::new(reader))
            .with_context(|| format!("Failed to parse video listing {}", path.display()))?;
        Ok(listing)
    }
}
