//! Content source traits
//!
//! The interfaces the dashboard consumes. Keeping these as trait seams lets
//! tests and the failure path substitute a fixture source for the live one.

use crate::error::Result;
use crate::store::types::Article;

use super::types::{Category, Track, TrackLyrics};

/// A source of news articles
pub trait NewsSource: Send + Sync {
    /// Display name for the source (e.g., "NewsAPI")
    fn name(&self) -> &'static str;

    /// Machine-readable identifier (e.g., "newsapi")
    fn id(&self) -> &'static str;

    /// Top headlines for a category
    fn top_headlines(&self, category: Category) -> Result<Vec<Article>>;

    /// Full-text article search
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Article>>;
}

/// A source of song lyrics
pub trait LyricsSource: Send + Sync {
    /// Display name for the source (e.g., "LRCLIB")
    fn name(&self) -> &'static str;

    /// Search for track candidates by text
    fn search(&self, query: &str) -> Result<Vec<Track>>;

    /// Fetch a single track with its lyrics bodies
    fn get_track(&self, id: u64) -> Result<TrackLyrics>;
}
