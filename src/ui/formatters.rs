use chrono::{DateTime, Utc};

use crate::news::Article;

pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let end = s
            .char_indices()
            .nth(max_len.saturating_sub(3))
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        format!("{}...", &s[..end])
    } else {
        s.to_string()
    }
}

pub fn format_relative_time(published_at: DateTime<Utc>) -> String {
    if published_at.timestamp() <= 0 {
        return String::new();
    }
    let elapsed_secs = Utc::now().signed_duration_since(published_at).num_seconds();
    if elapsed_secs < 0 {
        return "just now".to_string();
    }
    let mins = elapsed_secs / 60;
    let hours = mins / 60;
    let days = hours / 24;
    match () {
        _ if days > 0 => format!("{}d ago", days),
        _ if hours > 0 => format!("{}h ago", hours),
        _ if mins > 0 => format!("{}m ago", mins),
        _ => "just now".to_string(),
    }
}

pub fn format_tickers(tickers: &[String]) -> String {
    if tickers.is_empty() {
        "-".to_string()
    } else {
        tickers.join(", ")
    }
}

/// Wrap text to lines of at most `width` characters, breaking at word boundaries.
pub fn word_wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![];
    }
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// One listing line: age, source, flags, headline, tickers.
/// Flags are `*` for hot and `#` for featured.
pub fn format_article_row(article: &Article, headline_width: usize) -> String {
    let flags = format!(
        "{}{}",
        if article.is_featured { '#' } else { ' ' },
        if article.is_hot { '*' } else { ' ' }
    );
    format!(
        "{:>8}  {:<16} {} {:<width$}  [{}]",
        format_relative_time(article.published_at),
        truncate_str(&article.source, 16),
        flags,
        truncate_str(&article.title, headline_width),
        format_tickers(&article.related_stocks),
        width = headline_width
    )
}

/// Multi-line detail block for a single article.
pub fn format_article_detail(article: &Article, width: usize) -> String {
    let mut out = Vec::new();
    out.extend(word_wrap(&article.title, width));
    out.push(format!(
        "{} | {} | {} | {}",
        article.source,
        article.category,
        format_relative_time(article.published_at),
        format_tickers(&article.related_stocks)
    ));
    if !article.summary.is_empty() {
        out.push(String::new());
        out.extend(word_wrap(&article.summary, width));
    }
    if let Some(url) = &article.url {
        out.push(String::new());
        out.push(url.clone());
    }
    out.join("\n")
}
