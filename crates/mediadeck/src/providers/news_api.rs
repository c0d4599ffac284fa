//! NewsAPI provider
//!
//! Implementation of `NewsSource` for the NewsAPI headlines service
//! (<https://newsapi.org/>).

use crate::config::providers::{NEWS_API_BASE, NEWS_COUNTRY, NEWS_PAGE_SIZE};
use crate::error::{AppError, Result};
use crate::network::HttpClient;
use crate::store::types::Article;

use super::traits::NewsSource;
use super::types::Category;

use serde::Deserialize;

// =============================================================================
// Internal API response types (serde)
// =============================================================================

#[derive(Debug, Deserialize)]
struct NaResponse {
    status: String,
    #[serde(default)]
    #[allow(dead_code)]
    #[serde(rename = "totalResults")]
    total_results: usize,
    #[serde(default)]
    articles: Vec<NaArticle>,
}

#[derive(Debug, Deserialize)]
struct NaArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(default, rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(default)]
    source: NaSource,
    #[serde(default)]
    author: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NaSource {
    #[serde(default)]
    name: Option<String>,
}

// =============================================================================
// NaArticle -> Article conversion
// =============================================================================

/// Convert an empty or whitespace-only string to None
fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

impl From<NaArticle> for Article {
    fn from(na: NaArticle) -> Self {
        let mut article = Article::new(na.title, na.url)
            .with_image_opt(non_empty(na.url_to_image))
            .with_source_opt(non_empty(na.source.name))
            .with_author_opt(non_empty(na.author));

        if let Some(description) = non_empty(na.description) {
            article = article.with_description(description);
        }
        if let Some(published_at) = non_empty(na.published_at) {
            article = article.with_published_at(published_at);
        }

        article
    }
}

// =============================================================================
// NewsApiSource
// =============================================================================

/// NewsAPI content source
pub struct NewsApiSource {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl NewsApiSource {
    /// Create a source using the default server
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: NEWS_API_BASE.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a source with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<Article>> {
        let resp: NaResponse = self.client.get_json_with_query(&self.url(path), params)?;

        if resp.status != "ok" {
            return Err(AppError::Provider(format!(
                "NewsAPI returned status '{}'",
                resp.status
            )));
        }

        // Entries without a URL can't be favorited or opened; drop them
        Ok(resp
            .articles
            .into_iter()
            .filter(|a| !a.url.is_empty())
            .map(Article::from)
            .collect())
    }
}

impl NewsSource for NewsApiSource {
    fn name(&self) -> &'static str {
        "NewsAPI"
    }

    fn id(&self) -> &'static str {
        "newsapi"
    }

    fn top_headlines(&self, category: Category) -> Result<Vec<Article>> {
        let page_size = NEWS_PAGE_SIZE.to_string();
        self.fetch(
            "/top-headlines",
            &[
                ("country", NEWS_COUNTRY),
                ("category", category.id()),
                ("pageSize", &page_size),
                ("apiKey", &self.api_key),
            ],
        )
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<Article>> {
        let page_size = limit.to_string();
        self.fetch(
            "/everything",
            &[
                ("q", query),
                ("pageSize", &page_size),
                ("apiKey", &self.api_key),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_conversion() {
        let na = NaArticle {
            title: "Headline".to_string(),
            url: "https://example.com/story".to_string(),
            description: Some("Summary".to_string()),
            url_to_image: Some("".to_string()),
            published_at: Some("2024-05-01T12:00:00Z".to_string()),
            source: NaSource {
                name: Some("Daily".to_string()),
            },
            author: Some("  ".to_string()),
        };

        let article = Article::from(na);
        assert_eq!(article.title, "Headline");
        assert_eq!(article.url, "https://example.com/story");
        assert_eq!(article.description.as_deref(), Some("Summary"));
        // Empty and whitespace-only strings become None
        assert!(article.image_url.is_none());
        assert!(article.author.is_none());
        assert_eq!(article.source_name.as_deref(), Some("Daily"));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": {"id": null, "name": "Wire"},
                "author": "A. Writer",
                "title": "T",
                "description": null,
                "url": "https://example.com/t",
                "urlToImage": null,
                "publishedAt": "2024-05-01T12:00:00Z",
                "content": "ignored"
            }]
        }"#;

        let resp: NaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.articles.len(), 1);

        let article = Article::from(resp.articles.into_iter().next().unwrap());
        assert_eq!(article.source_name.as_deref(), Some("Wire"));
        assert!(article.description.is_none());
    }

    #[test]
    fn test_error_status_rejected() {
        let json = r#"{"status": "error", "articles": []}"#;
        let resp: NaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "error");
    }
}
