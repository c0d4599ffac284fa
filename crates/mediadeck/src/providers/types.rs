//! Shared provider types
//!
//! Types used across the content sources.

use serde::{Deserialize, Serialize};

/// News category
///
/// The fixed set of categories the headlines API understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Business,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// Machine-readable identifier (the API's category parameter)
    pub fn id(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Business => "Business",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Science => "Science",
            Category::Sports => "Sports",
            Category::Technology => "Technology",
        }
    }

    /// Parse a category id; unknown ids fall back to General
    pub fn from_id(id: &str) -> Self {
        Category::ALL
            .into_iter()
            .find(|c| c.id() == id)
            .unwrap_or_default()
    }

    /// The next category in display order, wrapping around
    pub fn next(self) -> Self {
        let idx = Category::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Category::ALL[(idx + 1) % Category::ALL.len()]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

// =============================================================================
// Track - a lyrics search candidate
// =============================================================================

/// A track from the lyrics directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// Directory-assigned track id (identity for music favorites)
    pub id: u64,
    pub track_name: String,
    pub artist_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_name: Option<String>,
    /// Track length in seconds
    #[serde(default)]
    pub duration_secs: f64,
    /// True for instrumental tracks (no lyrics)
    #[serde(default)]
    pub instrumental: bool,
}

impl Track {
    /// Track length formatted as m:ss
    pub fn format_duration(&self) -> String {
        let total = self.duration_secs.max(0.0) as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }
}

/// A track together with its lyrics bodies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackLyrics {
    #[serde(flatten)]
    pub track: Track,
    /// Plain-text lyrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_lyrics: Option<String>,
    /// Time-synchronized (LRC) lyrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_lyrics: Option<String>,
}
