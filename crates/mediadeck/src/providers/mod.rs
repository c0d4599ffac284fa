//! Content sources
//!
//! Providers for news headlines (NewsAPI plus a static fixture fallback)
//! and song lyrics (LRCLIB).

pub mod lrclib;
pub mod mock;
pub mod news_api;
pub mod traits;
pub mod types;

// Re-exports
pub use lrclib::LrclibSource;
pub use mock::MockNewsSource;
pub use news_api::NewsApiSource;
pub use traits::{LyricsSource, NewsSource};
pub use types::{Category, Track, TrackLyrics};

use crate::error::Result;
use crate::store::types::Article;

/// News source with a failure fallback
///
/// Serves from the primary source; on any error, logs a warning and serves
/// the fallback instead, so the feed is never empty on transport failure.
/// Reports whether the last response came from the fallback so the UI can
/// show a notice.
pub struct FallbackNewsSource {
    primary: Box<dyn NewsSource>,
    fallback: Box<dyn NewsSource>,
}

/// A news response together with where it came from
pub struct NewsResponse {
    pub articles: Vec<Article>,
    /// True when the primary source failed and the fallback served instead
    pub degraded: bool,
}

impl FallbackNewsSource {
    /// Wrap a primary source with a fallback
    pub fn new(primary: Box<dyn NewsSource>, fallback: Box<dyn NewsSource>) -> Self {
        Self { primary, fallback }
    }

    /// The standard pairing: live NewsAPI backed by the static fixtures
    pub fn with_defaults(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::new(
            Box::new(NewsApiSource::new(api_key)?),
            Box::new(MockNewsSource::new()),
        ))
    }

    /// Top headlines, degrading to the fallback on primary failure
    pub fn top_headlines(&self, category: Category) -> Result<NewsResponse> {
        match self.primary.top_headlines(category) {
            Ok(articles) => Ok(NewsResponse {
                articles,
                degraded: false,
            }),
            Err(e) => {
                log::warn!(
                    "{} headlines failed ({}); serving {} instead",
                    self.primary.name(),
                    e,
                    self.fallback.name()
                );
                Ok(NewsResponse {
                    articles: self.fallback.top_headlines(category)?,
                    degraded: true,
                })
            }
        }
    }

    /// Article search, degrading to the fallback on primary failure
    pub fn search(&self, query: &str, limit: usize) -> Result<NewsResponse> {
        match self.primary.search(query, limit) {
            Ok(articles) => Ok(NewsResponse {
                articles,
                degraded: false,
            }),
            Err(e) => {
                log::warn!(
                    "{} search failed ({}); serving {} instead",
                    self.primary.name(),
                    e,
                    self.fallback.name()
                );
                Ok(NewsResponse {
                    articles: self.fallback.search(query, limit)?,
                    degraded: true,
                })
            }
        }
    }
}
