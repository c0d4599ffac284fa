//! Local persistence
//!
//! The favorites/preferences store, its JSON file layer, and the types it
//! persists.

pub mod preferences;
pub mod storage;
#[allow(clippy::module_inception)]
pub mod store;
pub mod types;

// Re-export common types
pub use preferences::{Preferences, PreferencesPatch};
pub use store::Store;
pub use types::{keys, Article, Snapshot, Theme, User};
