use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Markets,
    Tech,
    Earnings,
    Economy,
    Crypto,
    #[default]
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Markets => "markets",
            Category::Tech => "tech",
            Category::Earnings => "earnings",
            Category::Economy => "economy",
            Category::Crypto => "crypto",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown labels fall back to `General` rather than failing.
impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "markets" | "market" | "stocks" => Category::Markets,
            "tech" | "technology" => Category::Tech,
            "earnings" => Category::Earnings,
            "economy" | "macro" => Category::Economy,
            "crypto" | "cryptocurrency" => Category::Crypto,
            _ => Category::General,
        })
    }
}

/// A normalised news article as held in the service snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub content: String,
    pub category: Category,
    pub source: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub related_stocks: Vec<String>,
    #[serde(default)]
    pub is_hot: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Article {
    /// Attach ticker symbols, uppercased, keeping first-seen order.
    pub fn with_related_stocks<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for t in tickers {
            let t = t.as_ref().trim().to_uppercase();
            if !t.is_empty() && !self.related_stocks.contains(&t) {
                self.related_stocks.push(t);
            }
        }
        self
    }
}

/// Whole-word, case-insensitive ticker check.
/// "Darma (DEWA) laba" matches DEWA, "Dewan Pengawas" does not.
pub fn title_contains_ticker(title: &str, ticker: &str) -> bool {
    if ticker.is_empty() || title.is_empty() {
        return false;
    }
    let hay = title.to_uppercase();
    let needle = ticker.to_uppercase();
    let is_word = |c: char| c.is_alphanumeric();

    let mut start = 0;
    while let Some(pos) = hay[start..].find(&needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let before_ok = hay[..begin].chars().next_back().is_none_or(|c| !is_word(c));
        let after_ok = hay[end..].chars().next().is_none_or(|c| !is_word(c));
        if before_ok && after_ok {
            return true;
        }
        start = begin + needle.chars().next().map(char::len_utf8).unwrap_or(1);
    }
    false
}
