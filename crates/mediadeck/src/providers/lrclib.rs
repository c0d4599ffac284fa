//! LRCLIB provider
//!
//! Implementation of `LyricsSource` for the LRCLIB lyrics directory
//! (<https://lrclib.net/>).

use crate::config::providers::{LRCLIB_BASE, LYRICS_RESULT_LIMIT};
use crate::error::Result;
use crate::network::HttpClient;

use super::traits::LyricsSource;
use super::types::{Track, TrackLyrics};

use serde::Deserialize;

// =============================================================================
// Internal API response types (serde)
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LrcTrack {
    id: u64,
    #[serde(default)]
    track_name: String,
    #[serde(default)]
    artist_name: String,
    #[serde(default)]
    album_name: Option<String>,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    instrumental: bool,
    #[serde(default)]
    plain_lyrics: Option<String>,
    #[serde(default)]
    synced_lyrics: Option<String>,
}

impl From<LrcTrack> for Track {
    fn from(lrc: LrcTrack) -> Self {
        Track {
            id: lrc.id,
            track_name: lrc.track_name,
            artist_name: lrc.artist_name,
            album_name: lrc.album_name.filter(|a| !a.trim().is_empty()),
            duration_secs: lrc.duration,
            instrumental: lrc.instrumental,
        }
    }
}

impl From<LrcTrack> for TrackLyrics {
    fn from(lrc: LrcTrack) -> Self {
        let plain_lyrics = lrc.plain_lyrics.clone().filter(|l| !l.is_empty());
        let synced_lyrics = lrc.synced_lyrics.clone().filter(|l| !l.is_empty());
        TrackLyrics {
            track: Track::from(lrc),
            plain_lyrics,
            synced_lyrics,
        }
    }
}

// =============================================================================
// LrclibSource
// =============================================================================

/// LRCLIB lyrics source
///
/// The directory is free and keyless; search results are capped at
/// `LYRICS_RESULT_LIMIT` candidates.
pub struct LrclibSource {
    client: HttpClient,
    base_url: String,
}

impl LrclibSource {
    /// Create a source using the default server
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: LRCLIB_BASE.to_string(),
        })
    }

    /// Create a source with a custom base URL (for testing or mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl LyricsSource for LrclibSource {
    fn name(&self) -> &'static str {
        "LRCLIB"
    }

    fn search(&self, query: &str) -> Result<Vec<Track>> {
        let tracks: Vec<LrcTrack> = self
            .client
            .get_json_with_query(&self.url("/search"), &[("q", query)])?;

        Ok(tracks
            .into_iter()
            .take(LYRICS_RESULT_LIMIT)
            .map(Track::from)
            .collect())
    }

    fn get_track(&self, id: u64) -> Result<TrackLyrics> {
        let track: LrcTrack = self.client.get_json(&self.url(&format!("/get/{}", id)))?;
        Ok(TrackLyrics::from(track))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_name() {
        let source = LrclibSource::with_base_url("http://localhost:1").unwrap();
        assert_eq!(source.name(), "LRCLIB");
    }

    #[test]
    fn test_track_parsing() {
        let json = r#"{
            "id": 123,
            "trackName": "Song",
            "artistName": "Artist",
            "albumName": "Album",
            "duration": 185.4,
            "instrumental": false,
            "plainLyrics": "line one\nline two",
            "syncedLyrics": "[00:01.00] line one"
        }"#;

        let lrc: LrcTrack = serde_json::from_str(json).unwrap();
        let lyrics = TrackLyrics::from(lrc);

        assert_eq!(lyrics.track.id, 123);
        assert_eq!(lyrics.track.track_name, "Song");
        assert_eq!(lyrics.track.album_name.as_deref(), Some("Album"));
        assert!(lyrics.plain_lyrics.as_deref().unwrap().contains("line one"));
        assert!(lyrics.synced_lyrics.is_some());
    }

    #[test]
    fn test_instrumental_without_lyrics() {
        let json = r#"{
            "id": 7,
            "trackName": "Interlude",
            "artistName": "Artist",
            "albumName": null,
            "duration": 60,
            "instrumental": true,
            "plainLyrics": null,
            "syncedLyrics": null
        }"#;

        let lrc: LrcTrack = serde_json::from_str(json).unwrap();
        let lyrics = TrackLyrics::from(lrc);

        assert!(lyrics.track.instrumental);
        assert!(lyrics.plain_lyrics.is_none());
        assert!(lyrics.synced_lyrics.is_none());
        assert!(lyrics.track.album_name.is_none());
    }

    #[test]
    fn test_search_result_shape() {
        // Search responses omit nothing but may carry empty lyric bodies
        let json = r#"[{"id": 1, "trackName": "A", "artistName": "B", "duration": 100}]"#;
        let tracks: Vec<LrcTrack> = serde_json::from_str(json).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(Track::from(tracks.into_iter().next().unwrap()).id, 1);
    }
}
