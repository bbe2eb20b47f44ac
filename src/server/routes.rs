use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::error;

use crate::error::NewsError;
use crate::news::{Article, NewsService, search};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewsType {
    #[default]
    All,
    Hot,
    Featured,
}

impl FromStr for NewsType {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(NewsType::All),
            "hot" => Ok(NewsType::Hot),
            "featured" => Ok(NewsType::Featured),
            other => Err(NewsError::InvalidRequest(format!(
                "unknown news type '{other}', expected all, hot or featured"
            ))),
        }
    }
}

/// Body of every `/news` response, success or failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub articles: Vec<Article>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewsResponse {
    pub fn ok(articles: Vec<Article>) -> Self {
        Self {
            success: true,
            error: None,
            count: articles.len(),
            articles,
            timestamp: Some(Utc::now()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            articles: Vec::new(),
            count: 0,
            timestamp: None,
        }
    }
}

pub type Reply = (StatusCode, NewsResponse);

/// `limit` ≤ 0, missing or unparsable means no limit.
pub fn parse_limit(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n as usize)
}

fn apply_limit(mut articles: Vec<Article>, limit: Option<usize>) -> Vec<Article> {
    if let Some(limit) = limit {
        articles.truncate(limit);
    }
    articles
}

fn upstream_failure(err: NewsError) -> Reply {
    error!(error = %err, "news request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        NewsResponse::failure(err.to_string()),
    )
}

/// `GET /news?type={all|hot|featured}&limit=N`
pub async fn get_news(service: &NewsService, params: &HashMap<String, String>) -> Reply {
    let news_type = match params.get("type").map(|s| s.parse::<NewsType>()) {
        None => NewsType::All,
        Some(Ok(t)) => t,
        Some(Err(e)) => return (StatusCode::BAD_REQUEST, NewsResponse::failure(e.to_string())),
    };
    let limit = parse_limit(params.get("limit").map(String::as_str));

    let articles = match news_type {
        NewsType::All => service.fetch_all_news().await.map(|a| a.to_vec()),
        NewsType::Hot => service.get_hot_news().await,
        NewsType::Featured => service
            .get_featured_story()
            .await
            .map(|f| f.into_iter().collect()),
    };

    match articles {
        Ok(articles) => (StatusCode::OK, NewsResponse::ok(apply_limit(articles, limit))),
        Err(e) => upstream_failure(e),
    }
}

/// `GET /news/search?q=...&limit=N`
pub async fn search_news(service: &NewsService, params: &HashMap<String, String>) -> Reply {
    let query = params.get("q").map(String::as_str).unwrap_or_default();
    let limit = parse_limit(params.get("limit").map(String::as_str));

    if query.trim().is_empty() {
        return (StatusCode::OK, NewsResponse::ok(Vec::new()));
    }

    match service.fetch_all_news().await {
        Ok(articles) => {
            let results = search(query, &articles);
            (StatusCode::OK, NewsResponse::ok(apply_limit(results, limit)))
        }
        Err(e) => upstream_failure(e),
    }
}

/// Route a request line to its handler, returning status and JSON body.
pub async fn dispatch(service: &NewsService, method: &str, target: &str) -> (StatusCode, String) {
    let url = match url::Url::parse("http://localhost").and_then(|base| base.join(target)) {
        Ok(url) => url,
        Err(e) => {
            return encode(
                StatusCode::BAD_REQUEST,
                &NewsResponse::failure(format!("malformed request target: {e}")),
            );
        }
    };

    if method != "GET" {
        return encode(
            StatusCode::METHOD_NOT_ALLOWED,
            &NewsResponse::failure(format!("method {method} not allowed")),
        );
    }

    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    match url.path().trim_end_matches('/') {
        "/news" => {
            let (status, body) = get_news(service, &params).await;
            encode(status, &body)
        }
        "/news/search" => {
            let (status, body) = search_news(service, &params).await;
            encode(status, &body)
        }
        "/health" => (StatusCode::OK, r#"{"status":"ok"}"#.to_string()),
        path => encode(
            StatusCode::NOT_FOUND,
            &NewsResponse::failure(format!("no route for {path}")),
        ),
    }
}

fn encode(status: StatusCode, body: &NewsResponse) -> (StatusCode, String) {
    match serde_json::to_string(body) {
        Ok(json) => (status, json),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!(r#"{{"success":false,"error":"encode failed: {e}","articles":[],"count":0}}"#),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_parsing() {
        assert_eq!(parse_limit(None), None);
        assert_eq!(parse_limit(Some("0")), None);
        assert_eq!(parse_limit(Some("-3")), None);
        assert_eq!(parse_limit(Some("abc")), None);
        assert_eq!(parse_limit(Some(" 2 ")), Some(2));
    }

    #[test]
    fn news_type_parsing() {
        assert_eq!("HOT".parse::<NewsType>().unwrap(), NewsType::Hot);
        assert_eq!("".parse::<NewsType>().unwrap(), NewsType::All);
        assert!(matches!(
            "trending".parse::<NewsType>(),
            Err(NewsError::InvalidRequest(_))
        ));
    }

    #[test]
    fn failure_body_shape() {
        let json = serde_json::to_value(NewsResponse::failure("boom")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert_eq!(json["count"], 0);
        assert!(json["articles"].as_array().unwrap().is_empty());
        assert!(json.get("timestamp").is_none());
    }
}
