//! Local favorites & preferences store
//!
//! Key-value persistence over the data directory: four independent
//! collections (news favorites, music favorites, search history,
//! preferences) plus two session fields (user, theme). Each key is its own
//! JSON file and is read-modify-written independently; there is no
//! cross-collection transaction.
//!
//! The news favorites exist in two representations: the full article
//! records are authoritative, and the bare URL list is rewritten from them
//! after every change so the two cannot drift.

use crate::config::ui::SEARCH_HISTORY_LIMIT;
use crate::error::Result;
use crate::store::preferences::{Preferences, PreferencesPatch};
use crate::store::storage;
use crate::store::types::{keys, Article, Snapshot, Theme, User};
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;

/// File-backed store for favorites, history, preferences, and session state
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open the store at the default data directory, creating it if needed
    pub fn open() -> Result<Self> {
        let dir = storage::ensure_data_dir()?;
        Ok(Self { dir })
    }

    /// Open the store at a specific directory (for testing and overrides)
    pub fn open_at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store persists into
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    // =========================================================================
    // Raw collection operations
    // =========================================================================

    /// Load the collection stored at `key`
    ///
    /// Absent, empty, or unparsable data all read as an empty collection;
    /// this never fails.
    pub fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        storage::load_or_default(&self.key_path(key))
    }

    /// Persist a collection under `key`
    pub fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        storage::save_to(&self.key_path(key), &items)
    }

    /// Delete the value stored at `key` entirely
    ///
    /// Callers treat "absent" and "empty" as equivalent on the next load.
    pub fn clear_collection(&self, key: &str) -> Result<()> {
        storage::delete_at(&self.key_path(key))
    }

    /// Toggle membership of `item` in the collection at `key`
    ///
    /// If an element matching `item` under `eq` is present it is removed,
    /// otherwise `item` is appended. The result is persisted. Returns the
    /// new collection and whether the net effect was an addition.
    pub fn toggle_membership<T, F>(&self, key: &str, item: T, eq: F) -> Result<(Vec<T>, bool)>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(&T, &T) -> bool,
    {
        let mut items: Vec<T> = self.load_collection(key);
        let len_before = items.len();
        items.retain(|existing| !eq(existing, &item));

        let added = items.len() == len_before;
        if added {
            items.push(item);
        }

        self.save_collection(key, &items)?;
        Ok((items, added))
    }

    // =========================================================================
    // News favorites
    // =========================================================================

    /// All favorite articles (full records)
    pub fn news_favorites(&self) -> Vec<Article> {
        self.load_collection(keys::FAVORITE_ARTICLES)
    }

    /// Favorite article URLs, read from the derived URL list
    pub fn news_favorite_urls(&self) -> Vec<String> {
        self.load_collection(keys::FAVORITES)
    }

    /// Check whether an article URL is favorited
    pub fn is_news_favorite(&self, url: &str) -> bool {
        self.news_favorites().iter().any(|a| a.url == url)
    }

    /// Toggle an article in the news favorites
    ///
    /// Updates the authoritative record collection, then rewrites the URL
    /// list from it. Returns whether the article was added.
    pub fn toggle_news_favorite(&self, article: &Article) -> Result<bool> {
        let (records, added) =
            self.toggle_membership(keys::FAVORITE_ARTICLES, article.clone(), |a, b| {
                a.url == b.url
            })?;
        self.sync_favorite_urls(&records)?;
        Ok(added)
    }

    /// Remove a favorite article by URL
    pub fn remove_news_favorite(&self, url: &str) -> Result<()> {
        let mut records = self.news_favorites();
        records.retain(|a| a.url != url);
        self.save_collection(keys::FAVORITE_ARTICLES, &records)?;
        self.sync_favorite_urls(&records)
    }

    /// Rewrite the URL-only list from the record collection
    fn sync_favorite_urls(&self, records: &[Article]) -> Result<()> {
        let urls: Vec<&str> = records.iter().map(|a| a.url.as_str()).collect();
        self.save_collection(keys::FAVORITES, &urls)
    }

    // =========================================================================
    // Music favorites
    // =========================================================================

    /// All favorite track ids
    pub fn music_favorite_ids(&self) -> Vec<u64> {
        self.load_collection(keys::MUSIC_FAVORITES)
    }

    /// Check whether a track id is favorited
    pub fn is_music_favorite(&self, id: u64) -> bool {
        self.music_favorite_ids().contains(&id)
    }

    /// Toggle a track id in the music favorites. Returns whether it was added.
    pub fn toggle_music_favorite(&self, id: u64) -> Result<bool> {
        let (_, added) = self.toggle_membership(keys::MUSIC_FAVORITES, id, |a, b| a == b)?;
        Ok(added)
    }

    // =========================================================================
    // Search history
    // =========================================================================

    /// Recent search queries, most recent first
    pub fn search_history(&self) -> Vec<String> {
        self.load_collection(keys::SEARCH_HISTORY)
    }

    /// Record a search query
    ///
    /// Prepends the query, removing any prior occurrence of the exact same
    /// text, then truncates to the most recent entries. Returns the new
    /// history.
    pub fn record_search(&self, query: &str) -> Result<Vec<String>> {
        let mut history = self.search_history();
        history.retain(|q| q != query);
        history.insert(0, query.to_string());
        history.truncate(SEARCH_HISTORY_LIMIT);

        self.save_collection(keys::SEARCH_HISTORY, &history)?;
        Ok(history)
    }

    /// Delete the search history
    pub fn clear_search_history(&self) -> Result<()> {
        self.clear_collection(keys::SEARCH_HISTORY)
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    /// Current preferences (documented defaults if absent or unreadable)
    pub fn preferences(&self) -> Preferences {
        storage::load_or_default(&self.key_path(keys::PREFERENCES))
    }

    /// Merge a patch into the current preferences and persist the result
    pub fn update_preferences(&self, patch: PreferencesPatch) -> Result<Preferences> {
        let mut prefs = self.preferences();
        patch.apply_to(&mut prefs);
        storage::save_to(&self.key_path(keys::PREFERENCES), &prefs)?;
        Ok(prefs)
    }

    // =========================================================================
    // Session fields
    // =========================================================================

    /// The stored user, if any (presence implies "authenticated")
    pub fn user(&self) -> Option<User> {
        storage::load_or_default(&self.key_path(keys::USER))
    }

    /// Overwrite the stored user; `None` deletes the record
    pub fn set_user(&self, user: Option<&User>) -> Result<()> {
        match user {
            Some(user) => storage::save_to(&self.key_path(keys::USER), user),
            None => storage::delete_at(&self.key_path(keys::USER)),
        }
    }

    /// The stored theme (light if never set)
    pub fn theme(&self) -> Theme {
        storage::load_or_default(&self.key_path(keys::THEME))
    }

    /// Overwrite the stored theme
    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        storage::save_to(&self.key_path(keys::THEME), &theme)
    }

    /// Log out: clears the user, the news favorites, and the preferences
    ///
    /// Music favorites and search history deliberately survive.
    pub fn logout(&self) -> Result<()> {
        storage::delete_at(&self.key_path(keys::USER))?;
        self.clear_collection(keys::FAVORITES)?;
        self.clear_collection(keys::FAVORITE_ARTICLES)?;
        storage::delete_at(&self.key_path(keys::PREFERENCES))
    }

    // =========================================================================
    // Export and purge
    // =========================================================================

    /// Read-only aggregate of the collections, for user-initiated export
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot {
            preferences: self.preferences(),
            favorites: self.news_favorite_urls(),
            music_favorites: self.music_favorite_ids(),
            search_history: self.search_history(),
        }
    }

    /// Delete the stored collections and preferences
    ///
    /// Clears both news-favorite keys, the music favorites, the search
    /// history, and the preferences; subsequent reads yield empty
    /// collections and default preferences. The user and theme are session
    /// state rather than content data and survive; removing the user is
    /// `logout`'s job.
    pub fn purge_all(&self) -> Result<()> {
        for key in [
            keys::PREFERENCES,
            keys::FAVORITES,
            keys::FAVORITE_ARTICLES,
            keys::MUSIC_FAVORITES,
            keys::SEARCH_HISTORY,
        ] {
            storage::delete_at(&self.key_path(key))?;
        }
        log::debug!("Purged stored data under {:?}", self.dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> Store {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = temp_dir().join(format!("mediadeck_store_test_{}", id));
        let _ = fs::remove_dir_all(&dir);
        Store::open_at(dir)
    }

    fn cleanup(store: &Store) {
        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let store = temp_store();

        let (list, added) = store
            .toggle_membership("favorites", "https://a".to_string(), |a, b| a == b)
            .unwrap();
        assert!(added);
        assert_eq!(list, vec!["https://a"]);

        let (list, added) = store
            .toggle_membership("favorites", "https://a".to_string(), |a, b| a == b)
            .unwrap();
        assert!(!added);
        assert!(list.is_empty());

        cleanup(&store);
    }

    #[test]
    fn test_double_toggle_preserves_order_of_others() {
        let store = temp_store();

        for url in ["https://a", "https://b", "https://c"] {
            store
                .toggle_membership("favorites", url.to_string(), |a, b| a == b)
                .unwrap();
        }

        store
            .toggle_membership("favorites", "https://b".to_string(), |a, b| a == b)
            .unwrap();
        let (list, _) = store
            .toggle_membership("favorites", "https://b".to_string(), |a, b| a == b)
            .unwrap();

        // b re-appended at the end; a and c keep their relative order
        assert_eq!(list, vec!["https://a", "https://c", "https://b"]);

        cleanup(&store);
    }

    #[test]
    fn test_load_collection_missing_is_empty() {
        let store = temp_store();
        let list: Vec<String> = store.load_collection("favorites");
        assert!(list.is_empty());
        cleanup(&store);
    }

    #[test]
    fn test_load_collection_corrupted_is_empty() {
        let store = temp_store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join("favorites.json"), "{{{ not json").unwrap();

        let list: Vec<String> = store.load_collection("favorites");
        assert!(list.is_empty());

        cleanup(&store);
    }

    #[test]
    fn test_clear_collection_then_load() {
        let store = temp_store();
        store.record_search("cat").unwrap();
        store.clear_collection(keys::SEARCH_HISTORY).unwrap();
        assert!(store.search_history().is_empty());
        // Clearing an already-absent key is not an error
        store.clear_collection(keys::SEARCH_HISTORY).unwrap();
        cleanup(&store);
    }

    #[test]
    fn test_record_search_caps_at_limit() {
        let store = temp_store();

        for i in 0..15 {
            store.record_search(&format!("query {}", i)).unwrap();
        }

        let history = store.search_history();
        assert_eq!(history.len(), SEARCH_HISTORY_LIMIT);
        assert_eq!(history[0], "query 14");

        cleanup(&store);
    }

    #[test]
    fn test_record_search_dedupes_and_moves_to_front() {
        let store = temp_store();

        store.record_search("dog").unwrap();
        store.record_search("cat").unwrap();
        // history is now [cat, dog]
        let history = store.record_search("dog").unwrap();

        assert_eq!(history, vec!["dog", "cat"]);
        assert_eq!(history.len(), 2);

        cleanup(&store);
    }

    #[test]
    fn test_record_search_is_case_sensitive() {
        let store = temp_store();

        store.record_search("Cat").unwrap();
        let history = store.record_search("cat").unwrap();

        assert_eq!(history, vec!["cat", "Cat"]);

        cleanup(&store);
    }

    #[test]
    fn test_news_favorite_urls_stay_in_lockstep() {
        let store = temp_store();

        let a = Article::new("A", "https://a");
        let b = Article::new("B", "https://b");

        assert!(store.toggle_news_favorite(&a).unwrap());
        assert!(store.toggle_news_favorite(&b).unwrap());
        assert_eq!(store.news_favorite_urls(), vec!["https://a", "https://b"]);

        assert!(!store.toggle_news_favorite(&a).unwrap());
        assert_eq!(store.news_favorite_urls(), vec!["https://b"]);
        assert_eq!(store.news_favorites().len(), 1);
        assert!(store.is_news_favorite("https://b"));
        assert!(!store.is_news_favorite("https://a"));

        cleanup(&store);
    }

    #[test]
    fn test_remove_news_favorite() {
        let store = temp_store();

        store
            .toggle_news_favorite(&Article::new("A", "https://a"))
            .unwrap();
        store.remove_news_favorite("https://a").unwrap();

        assert!(store.news_favorites().is_empty());
        assert!(store.news_favorite_urls().is_empty());

        cleanup(&store);
    }

    #[test]
    fn test_music_favorites_toggle() {
        let store = temp_store();

        assert!(store.toggle_music_favorite(42).unwrap());
        assert!(store.is_music_favorite(42));
        assert!(!store.toggle_music_favorite(42).unwrap());
        assert!(!store.is_music_favorite(42));

        cleanup(&store);
    }

    #[test]
    fn test_update_preferences_persists_merge() {
        let store = temp_store();

        let prefs = store
            .update_preferences(PreferencesPatch::new().language("es"))
            .unwrap();
        assert_eq!(prefs.content.language, "es");

        // Re-read from disk: merge result persisted, untouched fields intact
        let reloaded = store.preferences();
        assert_eq!(reloaded.content.language, "es");
        assert_eq!(reloaded.content.categories, vec!["general", "technology"]);
        assert!(reloaded.notifications.email);

        cleanup(&store);
    }

    #[test]
    fn test_session_fields() {
        let store = temp_store();

        assert!(store.user().is_none());
        let user = User {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        store.set_user(Some(&user)).unwrap();
        assert_eq!(store.user(), Some(user));

        store.set_user(None).unwrap();
        assert!(store.user().is_none());

        assert_eq!(store.theme(), Theme::Light);
        store.set_theme(Theme::Dark).unwrap();
        assert_eq!(store.theme(), Theme::Dark);

        cleanup(&store);
    }

    #[test]
    fn test_logout_scope() {
        let store = temp_store();

        store.set_user(Some(&User::default())).unwrap();
        store
            .toggle_news_favorite(&Article::new("A", "https://a"))
            .unwrap();
        store.toggle_music_favorite(7).unwrap();
        store.record_search("cat").unwrap();
        store
            .update_preferences(PreferencesPatch::new().language("fr"))
            .unwrap();

        store.logout().unwrap();

        assert!(store.user().is_none());
        assert!(store.news_favorites().is_empty());
        assert!(store.news_favorite_urls().is_empty());
        assert_eq!(store.preferences(), Preferences::default());
        // music favorites and history survive a logout
        assert_eq!(store.music_favorite_ids(), vec![7]);
        assert_eq!(store.search_history(), vec!["cat"]);

        cleanup(&store);
    }

    #[test]
    fn test_export_snapshot() {
        let store = temp_store();

        store
            .toggle_news_favorite(&Article::new("A", "https://a"))
            .unwrap();
        store.toggle_music_favorite(9).unwrap();
        store.record_search("lofi").unwrap();

        let snapshot = store.export_snapshot();
        assert_eq!(snapshot.favorites, vec!["https://a"]);
        assert_eq!(snapshot.music_favorites, vec![9]);
        assert_eq!(snapshot.search_history, vec!["lofi"]);
        assert_eq!(snapshot.preferences, Preferences::default());

        cleanup(&store);
    }

    #[test]
    fn test_purge_all_resets_collections() {
        let store = temp_store();

        store
            .toggle_news_favorite(&Article::new("A", "https://a"))
            .unwrap();
        store.toggle_music_favorite(1).unwrap();
        store.record_search("cat").unwrap();
        store
            .update_preferences(PreferencesPatch::new().language("de"))
            .unwrap();

        store.purge_all().unwrap();

        assert!(store.news_favorites().is_empty());
        assert!(store.news_favorite_urls().is_empty());
        assert!(store.music_favorite_ids().is_empty());
        assert!(store.search_history().is_empty());
        assert_eq!(store.preferences(), Preferences::default());

        cleanup(&store);
    }

    #[test]
    fn test_purge_all_leaves_session_fields() {
        let store = temp_store();

        let user = User {
            name: Some("Ada".to_string()),
            ..Default::default()
        };
        store.set_user(Some(&user)).unwrap();
        store.set_theme(Theme::Dark).unwrap();
        store.record_search("cat").unwrap();

        store.purge_all().unwrap();

        // Clearing stored data is not a sign-out and keeps the theme
        assert_eq!(store.user(), Some(user));
        assert_eq!(store.theme(), Theme::Dark);
        assert!(store.search_history().is_empty());

        cleanup(&store);
    }
}
