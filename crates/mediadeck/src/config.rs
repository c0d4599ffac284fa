//! Configuration constants for mediadeck

/// Application metadata
pub mod app {
    /// Application name (used for the data directory, etc.)
    pub const NAME: &str = "mediadeck";
}

/// Provider-related configuration
pub mod providers {
    /// NewsAPI base URL
    pub const NEWS_API_BASE: &str = "https://newsapi.org/v2";

    /// Country parameter for top-headlines requests
    pub const NEWS_COUNTRY: &str = "us";

    /// Headlines page size
    pub const NEWS_PAGE_SIZE: usize = 20;

    /// lrclib.net base URL
    pub const LRCLIB_BASE: &str = "https://lrclib.net/api";

    /// Maximum lyrics search results returned to callers
    pub const LYRICS_RESULT_LIMIT: usize = 20;
}

/// Network configuration
pub mod network {
    /// User agent sent with every request
    pub const USER_AGENT: &str = concat!("mediadeck/", env!("CARGO_PKG_VERSION"));

    /// Connect timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Read timeout in seconds
    pub const READ_TIMEOUT_SECS: u64 = 30;
}

/// UI-related configuration
pub mod ui {
    /// Trailing-edge debounce window for search input, in milliseconds
    pub const SEARCH_DEBOUNCE_MS: u64 = 500;

    /// Maximum retained search history entries
    pub const SEARCH_HISTORY_LIMIT: usize = 10;

    /// Search results shown per source
    pub const SEARCH_PAGE_SIZE: usize = 10;
}
