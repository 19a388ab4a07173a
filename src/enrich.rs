use crate::document::{Document, FetchError, RawRecord, VideoListing, VideoRecord};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Looks up the details of one video by id
pub trait DetailsSource: Send + Sync + 'static {
    fn fetch(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<VideoRecord, FetchError>> + Send;
}

/// Details source backed by an already-loaded listing
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    records: HashMap<String, RawRecord>,
}

impl CatalogSource {
    /// Index a listing by video id; items without an id cannot be looked up
    pub fn new(listing: VideoListing) -> Self {
        let records = listing
            .items
            .into_iter()
            .filter_map(|record| Some((record.video_id()?.to_string(), record)))
            .collect();
        Self { records }
    }

    /// Parse the record stored under `video_id`
    pub fn lookup(&self, video_id: &str) -> Result<VideoRecord, FetchError> {
        self.records
            .get(video_id)
            .ok_or_else(|| FetchError::NotFound(video_id.to_string()))?
            .parse()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DetailsSource for CatalogSource {
    fn fetch(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<VideoRecord, FetchError>> + Send {
        let result = self.lookup(video_id);
        async move { result }
    }
}

/// Ids of a listing in order, skipping items that carry no id
pub fn listing_ids(listing: &VideoListing) -> Vec<String> {
    listing
        .items
        .iter()
        .enumerate()
        .filter_map(|(position, record)| {
            let id = record.video_id();
            if id.is_none() {
                tracing::warn!("Skipping listing item {}: no video id", position);
            }
            id.map(str::to_string)
        })
        .collect()
}

/// Fetch every id concurrently and wait for all of them.
///
/// Each lookup writes into its own slot, so the corpus keeps the order of `ids`.
/// Failed, malformed or timed out lookups are logged and left out.
pub async fn collect_corpus<S: DetailsSource>(
    source: Arc<S>,
    ids: &[String],
    timeout: Duration,
) -> Vec<Document> {
    let mut tasks = JoinSet::new();
    for (slot, id) in ids.iter().cloned().enumerate() {
        let source = Arc::clone(&source);
        tasks.spawn(async move {
            let fetched = tokio::time::timeout(timeout, source.fetch(&id)).await;
            let result = match fetched {
                Ok(fetched) => fetched.and_then(VideoRecord::into_document),
                Err(_) => Err(FetchError::Timeout(id)),
            };
            (slot, result)
        });
    }

    let mut slots: Vec<Option<Document>> = vec![None; ids.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((slot, Ok(doc))) => slots[slot] = Some(doc),
            Ok((_, Err(err))) => tracing::warn!("Skipping document: {}", err),
            Err(err) => tracing::warn!("Details lookup task failed: {}", err),
        }
    }

    let documents: Vec<Document> = slots.into_iter().flatten().collect();
    tracing::debug!("Collected {} of {} documents", documents.len(), ids.len());
    documents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(json: &str) -> VideoListing {
        serde_json::from_str(json).unwrap()
    }

    /// Answers after a per-id delay, or never for "hang"
    struct SlowSource {
        catalog: CatalogSource,
    }

    impl DetailsSource for SlowSource {
        fn fetch(
            &self,
            video_id: &str,
        ) -> impl Future<Output = Result<VideoRecord, FetchError>> + Send {
            let delay = match video_id {
                "hang" => Duration::from_secs(3600),
                "a" => Duration::from_millis(30),
                _ => Duration::from_millis(1),
            };
            let result = self.catalog.lookup(video_id);
            async move {
                tokio::time::sleep(delay).await;
                result
            }
        }
    }

    const LISTING: &str = r#"{"items": [
        {"id": "a", "snippet": {"title": "A"}, "statistics": {"viewCount": 1}},
        {"id": "b", "snippet": {"title": "B"}, "statistics": {"viewCount": "2"}},
        {"id": "broken", "snippet": {"title": "C"}},
        {"id": "hang", "snippet": {"title": "D"}, "statistics": {"viewCount": 4}}
    ]}"#;

    #[tokio::test]
    async fn test_collect_keeps_order_and_skips_failures() {
        let source = Arc::new(CatalogSource::new(listing(LISTING)));
        let ids: Vec<String> = ["a", "missing", "b", "broken"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let docs = collect_corpus(source, &ids, Duration::from_secs(5)).await;
        let got: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(got, vec!["a", "b"]);
        assert_eq!(docs[1].view_count, 2);
    }

    #[tokio::test]
    async fn test_timeout_drops_document() {
        let source = Arc::new(SlowSource {
            catalog: CatalogSource::new(listing(LISTING)),
        });
        let ids: Vec<String> = ["hang", "a", "b"].iter().map(|s| s.to_string()).collect();

        let docs = collect_corpus(source, &ids, Duration::from_millis(200)).await;
        let got: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        // "a" finishes after "b" but keeps its slot
        assert_eq!(got, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_ids() {
        let source = Arc::new(CatalogSource::default());
        assert!(collect_corpus(source, &[], Duration::from_secs(1)).await.is_empty());
    }

    #[test]
    fn test_listing_ids() {
        assert_eq!(listing_ids(&listing(LISTING)), vec!["a", "b", "broken", "hang"]);
    }

    #[tokio::test]
    async fn test_malformed_record_only_drops_itself() {
        let listing = listing(
            r#"{"items": [
                {"id": "ok", "snippet": {"title": "fine"}, "statistics": {"viewCount": "10"}},
                {"id": "negative", "snippet": {"title": "bad"}, "statistics": {"viewCount": -1}},
                {"id": {"videoId": 7}, "snippet": {"title": "numeric id"}},
                {"snippet": {"title": "no id"}, "statistics": {"viewCount": 3}}
            ]}"#,
        );
        let ids = listing_ids(&listing);
        assert_eq!(ids, vec!["ok", "negative"]);

        let source = Arc::new(CatalogSource::new(listing));
        assert_eq!(source.len(), 2);
        assert!(matches!(source.lookup("negative"), Err(FetchError::Malformed { .. })));

        let docs = collect_corpus(source, &ids, Duration::from_secs(5)).await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "ok");
    }
}
