use crate::document::Document;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tag ranked by the average reach of the videos using it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagReach {
    pub keyword: String,
    /// Number of (video, tag) occurrences that matched the video's text
    pub frequency: usize,
    pub avg_reach: f64,
}

#[derive(Default)]
struct Accumulator {
    reach: u64,
    count: usize,
}

/// Rank tags that also occur in their video's title or description.
///
/// Reach is views + likes. Tags matched fewer than `min_occurrences` times are dropped.
pub fn rank_by_reach(
    documents: &[Document],
    min_occurrences: usize,
    top_n: usize,
) -> Vec<TagReach> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, Accumulator> = HashMap::new();

    for doc in documents {
        let reach = doc.view_count.saturating_add(doc.like_count);
        let title = doc.title.to_lowercase();
        let description = doc.description.to_lowercase();

        for tag in &doc.tags {
            let tag = tag.to_lowercase();
            if !(title.contains(&tag) || description.contains(&tag)) {
                continue;
            }
            let entry = totals.entry(tag.clone()).or_insert_with(|| {
                order.push(tag);
                Accumulator::default()
            });
            entry.reach = entry.reach.saturating_add(reach);
            entry.count += 1;
        }
    }

    let mut ranked: Vec<TagReach> = order
        .into_iter()
        .filter_map(|keyword| {
            let acc = totals.remove(&keyword)?;
            (acc.count >= min_occurrences).then(|| TagReach {
                avg_reach: acc.reach as f64 / acc.count as f64,
                frequency: acc.count,
                keyword,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.avg_reach.total_cmp(&a.avg_reach));
    ranked.truncate(top_n);
    ranked
}
