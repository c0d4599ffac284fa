//! Common data types for persistence
//!
//! Shared types used across the store and providers.

use serde::{Deserialize, Serialize};

/// Storage keys — one JSON file per key under the data directory
pub mod keys {
    /// News favorite URLs (bare strings, derived from the article records)
    pub const FAVORITES: &str = "favorites";
    /// Full favorite article records (authoritative news-favorite collection)
    pub const FAVORITE_ARTICLES: &str = "favorite_articles";
    /// Favorite track ids
    pub const MUSIC_FAVORITES: &str = "music_favorites";
    /// Recent search queries, most recent first
    pub const SEARCH_HISTORY: &str = "search_history";
    /// Nested user preferences
    pub const PREFERENCES: &str = "preferences";
    /// Authenticated user record
    pub const USER: &str = "user";
    /// Theme selection
    pub const THEME: &str = "theme";
}

// =============================================================================
// Article - A news article as fetched and as persisted
// =============================================================================

/// A news article
///
/// Used both for provider results and as the persisted favorite record.
/// Identity is the article URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    /// Headline
    pub title: String,
    /// Article URL (identity — unique within the favorites collection)
    pub url: String,
    /// Summary text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lead image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Publication timestamp (RFC 3339, as delivered by the API)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Publisher name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    /// Byline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Article {
    /// Create an article with minimal info
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: None,
            image_url: None,
            published_at: None,
            source_name: None,
            author: None,
        }
    }

    /// Set the summary
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the lead image URL from an Option (no-op if None)
    pub fn with_image_opt(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    /// Set the publication timestamp
    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    /// Set the publisher name from an Option (no-op if None)
    pub fn with_source_opt(mut self, source_name: Option<String>) -> Self {
        self.source_name = source_name;
        self
    }

    /// Set the byline from an Option (no-op if None)
    pub fn with_author_opt(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }
}

// =============================================================================
// Session types
// =============================================================================

/// An authenticated user
///
/// Presence of a stored record implies "authenticated". All fields are
/// optional; the original sign-in flow populated whatever it had.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
}

/// Theme selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

// =============================================================================
// Snapshot - user-initiated data export
// =============================================================================

/// Read-only aggregate of the persisted collections, for export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub preferences: crate::store::preferences::Preferences,
    /// News favorite URLs
    pub favorites: Vec<String>,
    /// Favorite track ids
    pub music_favorites: Vec<u64>,
    /// Recent search queries
    pub search_history: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_builder() {
        let article = Article::new("Title", "https://example.com/a")
            .with_description("Summary")
            .with_source_opt(Some("Daily".to_string()))
            .with_image_opt(None);

        assert_eq!(article.title, "Title");
        assert_eq!(article.url, "https://example.com/a");
        assert_eq!(article.description.as_deref(), Some("Summary"));
        assert_eq!(article.source_name.as_deref(), Some("Daily"));
        assert!(article.image_url.is_none());
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert!(Theme::Dark.is_dark());
        assert!(!Theme::default().is_dark());
    }

    #[test]
    fn test_theme_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(theme, Theme::Light);
    }

    #[test]
    fn test_article_optional_fields_omitted() {
        let json = serde_json::to_string(&Article::new("T", "u")).unwrap();
        assert!(!json.contains("description"));
        assert!(!json.contains("author"));
    }
}
