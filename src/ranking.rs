use crate::scoring::ScoredKeyword;

/// Default number of keywords returned
pub const DEFAULT_TOP_N: usize = 20;

/// Sort by score descending and keep the first `top_n`.
///
/// The sort is stable, so equal scores keep first-seen order.
pub fn rank(mut scored: Vec<ScoredKeyword>, top_n: usize) -> Vec<ScoredKeyword> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(text: &str, score: f64) -> ScoredKeyword {
        ScoredKeyword {
            text: text.to_string(),
            frequency: 1,
            relevance: 0.0,
            language: "en".to_string(),
            score,
        }
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let ranked = rank(
            vec![keyword("low", 1.0), keyword("high", 9.0), keyword("mid", 5.0)],
            2,
        );
        let texts: Vec<_> = ranked.iter().map(|k| k.text.as_str()).collect();
        assert_eq!(texts, vec!["high", "mid"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let ranked = rank(
            vec![
                keyword("first", 2.0),
                keyword("second", 2.0),
                keyword("top", 3.0),
                keyword("third", 2.0),
            ],
            DEFAULT_TOP_N,
        );
        let texts: Vec<_> = ranked.iter().map(|k| k.text.as_str()).collect();
        assert_eq!(texts, vec!["top", "first", "second", "third"]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
