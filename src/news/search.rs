//! Free-text search over an article snapshot.
//!
//! Matching is case-insensitive substring containment on title, summary,
//! content, category and source, plus exact membership in the related ticker
//! list. Only the three text fields carry weight; the rest decide inclusion
//! and leave ties in input order.

use super::model::Article;

const TITLE_WEIGHT: u32 = 3;
const SUMMARY_WEIGHT: u32 = 2;
const CONTENT_WEIGHT: u32 = 1;

struct FieldHits {
    title: bool,
    summary: bool,
    content: bool,
    other: bool,
}

impl FieldHits {
    fn of(needle: &str, article: &Article) -> Self {
        let contains = |field: &str| field.to_lowercase().contains(needle);
        Self {
            title: contains(&article.title),
            summary: contains(&article.summary),
            content: contains(&article.content),
            other: contains(article.category.as_str())
                || contains(&article.source)
                || article.related_stocks.iter().any(|t| t.to_lowercase() == needle),
        }
    }

    fn any(&self) -> bool {
        self.title || self.summary || self.content || self.other
    }

    fn score(&self) -> u32 {
        let mut score = 0;
        if self.title {
            score += TITLE_WEIGHT;
        }
        if self.summary {
            score += SUMMARY_WEIGHT;
        }
        if self.content {
            score += CONTENT_WEIGHT;
        }
        score
    }
}

/// Relevance of `article` for `query`, or `None` when nothing matches.
/// A match on category, source or ticker alone scores `Some(0)`.
pub fn relevance_score(query: &str, article: &Article) -> Option<u32> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let hits = FieldHits::of(&needle, article);
    hits.any().then(|| hits.score())
}

/// Rank the articles matching `query`, best first.
///
/// Whitespace-only queries return nothing. The sort is stable, so articles
/// with equal scores keep their order from `articles`.
pub fn search(query: &str, articles: &[Article]) -> Vec<Article> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(u32, &Article)> = articles
        .iter()
        .filter_map(|article| {
            let hits = FieldHits::of(&needle, article);
            hits.any().then(|| (hits.score(), article))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, a)| a.clone()).collect()
}
