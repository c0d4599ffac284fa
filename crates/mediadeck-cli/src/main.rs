//! Mediadeck CLI — terminal content dashboard
//!
//! News headlines, lyrics search, favorites, and preferences in a ratatui
//! interface. Content fetches run on worker threads reporting over a
//! channel; in-flight requests are never cancelled, so the last completion
//! to arrive wins.

use std::io;
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::{unbounded, Receiver, Sender};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::*;

use mediadeck::config::ui::{SEARCH_DEBOUNCE_MS, SEARCH_PAGE_SIZE};
use mediadeck::debounce::Debouncer;
use mediadeck::providers::{
    Category, FallbackNewsSource, LrclibSource, LyricsSource, Track, TrackLyrics,
};
use mediadeck::store::preferences::{NotificationsPatch, PrivacyPatch};
use mediadeck::store::{Article, PreferencesPatch, Store, Theme, User};

#[derive(Parser)]
#[command(name = "mediadeck", about = "Terminal content dashboard", version)]
struct Cli {
    /// Data directory override (defaults to the platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Initial feed category
    #[arg(long, default_value = "general")]
    category: Category,

    /// NewsAPI key (falls back to the NEWS_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Write a JSON snapshot of the stored data to FILE and exit
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

/// Dashboard sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Feed,
    Trending,
    Search,
    Favorites,
    Settings,
}

impl Section {
    const ALL: [Section; 5] = [
        Section::Feed,
        Section::Trending,
        Section::Search,
        Section::Favorites,
        Section::Settings,
    ];

    fn title(self) -> &'static str {
        match self {
            Section::Feed => "Feed",
            Section::Trending => "Trending",
            Section::Search => "Search",
            Section::Favorites => "Favorites",
            Section::Settings => "Settings",
        }
    }

    fn next(self) -> Self {
        let idx = Section::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Section::ALL[(idx + 1) % Section::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Section::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Section::ALL[(idx + Section::ALL.len() - 1) % Section::ALL.len()]
    }
}

/// Which result list a two-tab section is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResultTab {
    News,
    Music,
}

impl ResultTab {
    fn toggled(self) -> Self {
        match self {
            ResultTab::News => ResultTab::Music,
            ResultTab::Music => ResultTab::News,
        }
    }
}

/// Results delivered by worker threads
enum FetchResult {
    Headlines {
        generation: u64,
        for_trending: bool,
        articles: Vec<Article>,
        degraded: bool,
    },
    HeadlinesFailed {
        generation: u64,
        for_trending: bool,
        error: String,
    },
    Search {
        generation: u64,
        query: String,
        news: Result<Vec<Article>, String>,
        news_degraded: bool,
        tracks: Result<Vec<Track>, String>,
    },
    Lyrics {
        result: Result<TrackLyrics, String>,
    },
}

struct App {
    store: Store,
    news: Arc<FallbackNewsSource>,
    lyrics: Arc<LrclibSource>,
    results_tx: Sender<FetchResult>,

    section: Section,
    theme: Theme,
    user: Option<User>,
    status: String,
    running: bool,

    // Feed / Trending
    category: Category,
    feed: Vec<Article>,
    feed_state: ListState,
    feed_loading: bool,
    feed_degraded: bool,
    trending: Vec<Article>,
    trending_state: ListState,

    // Search
    query: String,
    debouncer: Debouncer,
    search_tab: ResultTab,
    news_results: Vec<Article>,
    track_results: Vec<Track>,
    search_state: ListState,
    search_loading: bool,
    selected_lyrics: Option<TrackLyrics>,
    // Monotonic request counter: stale completions are applied anyway
    // (last completion wins), but the status line can name them
    fetch_generation: u64,
    latest_applied: u64,

    // Favorites
    favorites_tab: ResultTab,
    favorite_articles: Vec<Article>,
    favorite_track_ids: Vec<u64>,
    favorites_state: ListState,
}

impl App {
    fn new(
        store: Store,
        news: FallbackNewsSource,
        lyrics: LrclibSource,
        category: Category,
        results_tx: Sender<FetchResult>,
    ) -> Self {
        let theme = store.theme();
        let user = store.user();
        let favorite_articles = store.news_favorites();
        let favorite_track_ids = store.music_favorite_ids();

        Self {
            store,
            news: Arc::new(news),
            lyrics: Arc::new(lyrics),
            results_tx,
            section: Section::Feed,
            theme,
            user,
            status: "Loading headlines...".to_string(),
            running: true,
            category,
            feed: Vec::new(),
            feed_state: ListState::default(),
            feed_loading: false,
            feed_degraded: false,
            trending: Vec::new(),
            trending_state: ListState::default(),
            query: String::new(),
            debouncer: Debouncer::new(Duration::from_millis(SEARCH_DEBOUNCE_MS)),
            search_tab: ResultTab::News,
            news_results: Vec::new(),
            track_results: Vec::new(),
            search_state: ListState::default(),
            search_loading: false,
            selected_lyrics: None,
            fetch_generation: 0,
            latest_applied: 0,
            favorites_tab: ResultTab::News,
            favorite_articles,
            favorite_track_ids,
            favorites_state: ListState::default(),
        }
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    // =========================================================================
    // Worker-thread fetches
    // =========================================================================

    /// Fetch headlines on a worker thread; the request is not cancellable
    fn spawn_headlines_fetch(&mut self, for_trending: bool) {
        self.fetch_generation += 1;
        let generation = self.fetch_generation;
        let category = if for_trending {
            Category::General
        } else {
            self.category
        };
        let news = self.news.clone();
        let tx = self.results_tx.clone();

        if !for_trending {
            self.feed_loading = true;
        }
        std::thread::spawn(move || {
            let msg = match news.top_headlines(category) {
                Ok(resp) => FetchResult::Headlines {
                    generation,
                    for_trending,
                    articles: resp.articles,
                    degraded: resp.degraded,
                },
                Err(e) => FetchResult::HeadlinesFailed {
                    generation,
                    for_trending,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg);
        });
    }

    /// Fire the debounced search: news and lyrics on one worker thread
    fn spawn_search(&mut self) {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            return;
        }

        self.fetch_generation += 1;
        let generation = self.fetch_generation;
        let news = self.news.clone();
        let lyrics = self.lyrics.clone();
        let tx = self.results_tx.clone();

        self.search_loading = true;
        self.set_status(format!("Searching \"{}\"...", query));
        std::thread::spawn(move || {
            let (news_result, news_degraded) = match news.search(&query, SEARCH_PAGE_SIZE) {
                Ok(resp) => (Ok(resp.articles), resp.degraded),
                Err(e) => (Err(e.to_string()), false),
            };
            let tracks = lyrics
                .search(&query)
                .map_err(|e| format!("{}: {}", lyrics.name(), e));
            let _ = tx.send(FetchResult::Search {
                generation,
                query,
                news: news_result,
                news_degraded,
                tracks,
            });
        });
    }

    fn spawn_lyrics_fetch(&mut self, id: u64) {
        let lyrics = self.lyrics.clone();
        let tx = self.results_tx.clone();
        self.set_status(format!(
            "Fetching track #{} from {}...",
            id,
            self.lyrics.name()
        ));
        std::thread::spawn(move || {
            let result = lyrics
                .get_track(id)
                .map_err(|e| format!("{}: {}", lyrics.name(), e));
            let _ = tx.send(FetchResult::Lyrics { result });
        });
    }

    /// Apply a worker result. Arrival order is completion order; the last
    /// completion overwrites what's displayed.
    fn apply_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Headlines {
                generation,
                for_trending,
                articles,
                degraded,
            } => {
                if for_trending {
                    self.trending = articles;
                    self.trending_state.select(if self.trending.is_empty() {
                        None
                    } else {
                        Some(0)
                    });
                } else {
                    self.feed_loading = false;
                    self.feed_degraded = degraded;
                    self.feed = articles;
                    self.feed_state
                        .select(if self.feed.is_empty() { None } else { Some(0) });
                }
                let stale = if generation < self.latest_applied {
                    " (stale)"
                } else {
                    ""
                };
                self.latest_applied = self.latest_applied.max(generation);
                if degraded {
                    self.set_status(format!(
                        "Live headlines unavailable; showing demo data{}",
                        stale
                    ));
                } else {
                    self.set_status(format!("Headlines updated{}", stale));
                }
            }
            FetchResult::HeadlinesFailed {
                generation,
                for_trending,
                error,
            } => {
                if !for_trending {
                    self.feed_loading = false;
                }
                self.latest_applied = self.latest_applied.max(generation);
                self.set_status(format!("Headline fetch failed: {}", error));
            }
            FetchResult::Search {
                generation,
                query,
                news,
                news_degraded,
                tracks,
            } => {
                self.search_loading = false;

                let mut failures = Vec::new();
                match news {
                    Ok(articles) => self.news_results = articles,
                    Err(e) => {
                        self.news_results.clear();
                        failures.push(format!("news: {}", e));
                    }
                }
                match tracks {
                    Ok(tracks) => self.track_results = tracks,
                    Err(e) => {
                        self.track_results.clear();
                        failures.push(format!("music: {}", e));
                    }
                }
                let len = match self.search_tab {
                    ResultTab::News => self.news_results.len(),
                    ResultTab::Music => self.track_results.len(),
                };
                clamp_selection(&mut self.search_state, len);
                self.selected_lyrics = None;

                let stale = if generation < self.latest_applied {
                    " (stale)"
                } else {
                    ""
                };
                self.latest_applied = self.latest_applied.max(generation);

                if failures.len() == 2 {
                    // Both sources down: a transient notice, nothing recorded
                    self.set_status(format!("Search failed ({})", failures.join("; ")));
                    return;
                }

                if let Err(e) = self.store.record_search(&query) {
                    log::warn!("Failed to record search: {}", e);
                }
                let mut note = format!(
                    "{} articles, {} tracks for \"{}\"{}",
                    self.news_results.len(),
                    self.track_results.len(),
                    query,
                    stale
                );
                if news_degraded {
                    note.push_str(" — live news unavailable, demo data shown");
                } else if let Some(failure) = failures.first() {
                    note.push_str(&format!(" — {}", failure));
                }
                self.set_status(note);
            }
            FetchResult::Lyrics { result } => match result {
                Ok(lyrics) => {
                    self.set_status(format!(
                        "Lyrics: {} — {}",
                        lyrics.track.artist_name, lyrics.track.track_name
                    ));
                    self.selected_lyrics = Some(lyrics);
                }
                Err(e) => self.set_status(format!("Lyrics fetch failed: {}", e)),
            },
        }
    }

    // =========================================================================
    // Store-backed actions
    // =========================================================================

    fn reload_favorites(&mut self) {
        self.favorite_articles = self.store.news_favorites();
        self.favorite_track_ids = self.store.music_favorite_ids();
        let len = match self.favorites_tab {
            ResultTab::News => self.favorite_articles.len(),
            ResultTab::Music => self.favorite_track_ids.len(),
        };
        clamp_selection(&mut self.favorites_state, len);
    }

    fn toggle_article_favorite(&mut self, article: Article) {
        match self.store.toggle_news_favorite(&article) {
            Ok(true) => self.set_status("Added to favorites"),
            Ok(false) => self.set_status("Removed from favorites"),
            Err(e) => self.set_status(format!("Favorite update failed: {}", e)),
        }
        self.reload_favorites();
    }

    fn toggle_track_favorite(&mut self, id: u64) {
        match self.store.toggle_music_favorite(id) {
            Ok(true) => self.set_status(format!("Track #{} added to favorites", id)),
            Ok(false) => self.set_status(format!("Track #{} removed from favorites", id)),
            Err(e) => self.set_status(format!("Favorite update failed: {}", e)),
        }
        self.reload_favorites();
    }

    fn remove_selected_favorite(&mut self) {
        let Some(idx) = self.favorites_state.selected() else {
            return;
        };
        let outcome = match self.favorites_tab {
            ResultTab::News => self
                .favorite_articles
                .get(idx)
                .map(|a| a.url.clone())
                .map(|url| self.store.remove_news_favorite(&url)),
            ResultTab::Music => self
                .favorite_track_ids
                .get(idx)
                .copied()
                .map(|id| self.store.toggle_music_favorite(id).map(|_| ())),
        };
        match outcome {
            Some(Ok(())) => self.set_status("Removed from favorites"),
            Some(Err(e)) => self.set_status(format!("Remove failed: {}", e)),
            None => {}
        }
        self.reload_favorites();
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = self.store.set_theme(self.theme) {
            self.set_status(format!("Theme not saved: {}", e));
        } else {
            self.set_status(match self.theme {
                Theme::Dark => "Dark theme",
                Theme::Light => "Light theme",
            });
        }
    }

    fn patch_preferences(&mut self, patch: PreferencesPatch, what: &str) {
        match self.store.update_preferences(patch) {
            Ok(_) => self.set_status(format!("Settings updated ({})", what)),
            Err(e) => self.set_status(format!("Settings not saved: {}", e)),
        }
    }

    fn login_local_user(&mut self) {
        let name = std::env::var("USER").unwrap_or_else(|_| "user".to_string());
        let user = User {
            name: Some(name.clone()),
            ..Default::default()
        };
        match self.store.set_user(Some(&user)) {
            Ok(()) => {
                self.user = Some(user);
                self.set_status(format!("Signed in as {}", name));
            }
            Err(e) => self.set_status(format!("Sign-in failed: {}", e)),
        }
    }

    fn logout(&mut self) {
        match self.store.logout() {
            Ok(()) => {
                self.user = None;
                self.reload_favorites();
                self.set_status("Signed out; favorites and preferences cleared");
            }
            Err(e) => self.set_status(format!("Sign-out failed: {}", e)),
        }
    }

    fn export_snapshot(&mut self) {
        let snapshot = self.store.export_snapshot();
        let path = self.store.dir().join("mediadeck-export.json");
        match serde_json::to_string_pretty(&snapshot)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()))
        {
            Ok(()) => self.set_status(format!("Data exported to {}", path.display())),
            Err(e) => self.set_status(format!("Export failed: {}", e)),
        }
    }

    fn purge_all(&mut self) {
        match self.store.purge_all() {
            Ok(()) => {
                self.reload_favorites();
                self.set_status("Stored data cleared");
            }
            Err(e) => self.set_status(format!("Clear failed: {}", e)),
        }
    }
}

fn clamp_selection(state: &mut ListState, len: usize) {
    match len {
        0 => state.select(None),
        _ => {
            let idx = state.selected().unwrap_or(0).min(len - 1);
            state.select(Some(idx));
        }
    }
}

fn move_selection(state: &mut ListState, len: usize, delta: i32) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0) as i32;
    let next = (current + delta).clamp(0, len as i32 - 1);
    state.select(Some(next as usize));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();

    let store = match cli.data_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            Store::open_at(dir)
        }
        None => Store::open()?,
    };

    // One-shot export mode: no TUI
    if let Some(path) = cli.export {
        let snapshot = store.export_snapshot();
        std::fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
        println!("Exported data to {}", path.display());
        return Ok(());
    }

    let api_key = cli
        .api_key
        .or_else(|| std::env::var("NEWS_API_KEY").ok())
        .unwrap_or_default();

    let news = FallbackNewsSource::with_defaults(api_key)?;
    let lyrics = LrclibSource::new()?;

    let (results_tx, results_rx): (Sender<FetchResult>, Receiver<FetchResult>) = unbounded();
    let mut app = App::new(store, news, lyrics, cli.category, results_tx);

    // Initial fetches before entering the TUI loop
    app.spawn_headlines_fetch(false);
    app.spawn_headlines_fetch(true);

    // Suppress stderr during the TUI — env_logger and TLS libs write there
    // and would corrupt the ratatui display.
    let saved_stderr = unsafe { libc::dup(2) };
    {
        let devnull = std::fs::File::open("/dev/null")?;
        unsafe { libc::dup2(devnull.as_raw_fd(), 2) };
    }

    terminal::enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();

    while app.running {
        terminal.draw(|f| draw_ui(f, &mut app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key.code);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();

            // Trailing-edge debounce: fire the search once input goes quiet
            if app.debouncer.poll() {
                app.spawn_search();
            }

            // Drain worker results; the last completion wins
            while let Ok(result) = results_rx.try_recv() {
                app.apply_result(result);
            }
        }
    }

    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    if saved_stderr >= 0 {
        unsafe {
            libc::dup2(saved_stderr, 2);
            libc::close(saved_stderr);
        }
    }

    Ok(())
}

// =============================================================================
// Input handling
// =============================================================================

fn handle_key(app: &mut App, code: KeyCode) {
    // Section switching and quit work everywhere except that typed
    // characters belong to the search box while it is active.
    match code {
        KeyCode::Tab => {
            app.section = app.section.next();
            return;
        }
        KeyCode::BackTab => {
            app.section = app.section.prev();
            return;
        }
        _ => {}
    }

    match app.section {
        Section::Feed => handle_feed_key(app, code),
        Section::Trending => handle_trending_key(app, code),
        Section::Search => handle_search_key(app, code),
        Section::Favorites => handle_favorites_key(app, code),
        Section::Settings => handle_settings_key(app, code),
    }
}

fn handle_feed_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Up => move_selection(&mut app.feed_state, app.feed.len(), -1),
        KeyCode::Down => move_selection(&mut app.feed_state, app.feed.len(), 1),
        KeyCode::Char('c') => {
            app.category = app.category.next();
            app.spawn_headlines_fetch(false);
        }
        KeyCode::Char('r') => app.spawn_headlines_fetch(false),
        KeyCode::Char('f') => {
            if let Some(article) = app
                .feed_state
                .selected()
                .and_then(|i| app.feed.get(i))
                .cloned()
            {
                app.toggle_article_favorite(article);
            }
        }
        _ => {}
    }
}

fn handle_trending_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Up => move_selection(&mut app.trending_state, app.trending.len(), -1),
        KeyCode::Down => move_selection(&mut app.trending_state, app.trending.len(), 1),
        KeyCode::Char('r') => app.spawn_headlines_fetch(true),
        KeyCode::Char('f') => {
            if let Some(article) = app
                .trending_state
                .selected()
                .and_then(|i| app.trending.get(i))
                .cloned()
            {
                app.toggle_article_favorite(article);
            }
        }
        _ => {}
    }
}

fn handle_search_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            if app.query.is_empty() {
                app.running = false;
            } else {
                // Clear the box; a cleared box means no pending search
                app.query.clear();
                app.debouncer.cancel();
                app.news_results.clear();
                app.track_results.clear();
                app.selected_lyrics = None;
            }
        }
        KeyCode::Char(c) => {
            app.query.push(c);
            app.debouncer.schedule();
        }
        KeyCode::Backspace => {
            app.query.pop();
            if app.query.is_empty() {
                app.debouncer.cancel();
                app.news_results.clear();
                app.track_results.clear();
                app.selected_lyrics = None;
            } else {
                app.debouncer.schedule();
            }
        }
        KeyCode::Left | KeyCode::Right => {
            app.search_tab = app.search_tab.toggled();
            let len = match app.search_tab {
                ResultTab::News => app.news_results.len(),
                ResultTab::Music => app.track_results.len(),
            };
            clamp_selection(&mut app.search_state, len);
        }
        KeyCode::Up => {
            let len = match app.search_tab {
                ResultTab::News => app.news_results.len(),
                ResultTab::Music => app.track_results.len(),
            };
            move_selection(&mut app.search_state, len, -1);
        }
        KeyCode::Down => {
            let len = match app.search_tab {
                ResultTab::News => app.news_results.len(),
                ResultTab::Music => app.track_results.len(),
            };
            move_selection(&mut app.search_state, len, 1);
        }
        KeyCode::Enter => match app.search_tab {
            // Favorite the selected article, or fetch lyrics for the track
            ResultTab::News => {
                if let Some(article) = app
                    .search_state
                    .selected()
                    .and_then(|i| app.news_results.get(i))
                    .cloned()
                {
                    app.toggle_article_favorite(article);
                }
            }
            ResultTab::Music => {
                if let Some(id) = app
                    .search_state
                    .selected()
                    .and_then(|i| app.track_results.get(i))
                    .map(|t| t.id)
                {
                    app.spawn_lyrics_fetch(id);
                }
            }
        },
        KeyCode::Delete => {
            if app.search_tab == ResultTab::Music {
                if let Some(id) = app
                    .search_state
                    .selected()
                    .and_then(|i| app.track_results.get(i))
                    .map(|t| t.id)
                {
                    app.toggle_track_favorite(id);
                }
            }
        }
        _ => {}
    }
}

fn handle_favorites_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('t') | KeyCode::Left | KeyCode::Right => {
            app.favorites_tab = app.favorites_tab.toggled();
            app.reload_favorites();
        }
        KeyCode::Up => {
            let len = match app.favorites_tab {
                ResultTab::News => app.favorite_articles.len(),
                ResultTab::Music => app.favorite_track_ids.len(),
            };
            move_selection(&mut app.favorites_state, len, -1);
        }
        KeyCode::Down => {
            let len = match app.favorites_tab {
                ResultTab::News => app.favorite_articles.len(),
                ResultTab::Music => app.favorite_track_ids.len(),
            };
            move_selection(&mut app.favorites_state, len, 1);
        }
        KeyCode::Char('d') | KeyCode::Delete => app.remove_selected_favorite(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, code: KeyCode) {
    let prefs = app.store.preferences();
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('m') => app.toggle_theme(),
        KeyCode::Char('e') => {
            let patch = PreferencesPatch {
                notifications: Some(NotificationsPatch {
                    email: Some(!prefs.notifications.email),
                    ..Default::default()
                }),
                ..Default::default()
            };
            app.patch_preferences(patch, "email notifications");
        }
        KeyCode::Char('p') => {
            let patch = PreferencesPatch {
                notifications: Some(NotificationsPatch {
                    push: Some(!prefs.notifications.push),
                    ..Default::default()
                }),
                ..Default::default()
            };
            app.patch_preferences(patch, "push notifications");
        }
        KeyCode::Char('n') => {
            let patch = PreferencesPatch {
                notifications: Some(NotificationsPatch {
                    new_articles: Some(!prefs.notifications.new_articles),
                    ..Default::default()
                }),
                ..Default::default()
            };
            app.patch_preferences(patch, "new-article notifications");
        }
        KeyCode::Char('g') => {
            let patch = PreferencesPatch {
                notifications: Some(NotificationsPatch {
                    trending: Some(!prefs.notifications.trending),
                    ..Default::default()
                }),
                ..Default::default()
            };
            app.patch_preferences(patch, "trending notifications");
        }
        KeyCode::Char('a') => {
            let patch = PreferencesPatch {
                privacy: Some(PrivacyPatch {
                    analytics: Some(!prefs.privacy.analytics),
                    ..Default::default()
                }),
                ..Default::default()
            };
            app.patch_preferences(patch, "analytics");
        }
        KeyCode::Char('z') => {
            let patch = PreferencesPatch {
                privacy: Some(PrivacyPatch {
                    personalization: Some(!prefs.privacy.personalization),
                    ..Default::default()
                }),
                ..Default::default()
            };
            app.patch_preferences(patch, "personalization");
        }
        KeyCode::Char('c') => {
            // Follow/unfollow the current feed category
            let id = app.category.id().to_string();
            let mut categories = prefs.content.categories.clone();
            if categories.contains(&id) {
                categories.retain(|c| c != &id);
            } else {
                categories.push(id);
            }
            app.patch_preferences(
                PreferencesPatch::new().categories(categories),
                "followed categories",
            );
        }
        KeyCode::Char('u') => match app.user {
            Some(_) => app.logout(),
            None => app.login_local_user(),
        },
        KeyCode::Char('x') => app.export_snapshot(),
        KeyCode::Char('X') => app.purge_all(),
        KeyCode::Char('h') => match app.store.clear_search_history() {
            Ok(()) => app.set_status("Search history cleared"),
            Err(e) => app.set_status(format!("Clear failed: {}", e)),
        },
        _ => {}
    }
}

// =============================================================================
// Drawing
// =============================================================================

fn accent(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::Magenta,
        Theme::Light => Color::Blue,
    }
}

fn draw_ui(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let outer = Block::default()
        .title(format!(" Mediadeck v{} ", env!("CARGO_PKG_VERSION")))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::vertical([
        Constraint::Length(2), // section tabs
        Constraint::Min(5),    // content
        Constraint::Length(2), // status + help
    ])
    .split(inner);

    draw_tabs(f, app, chunks[0]);
    match app.section {
        Section::Feed => draw_feed(f, app, chunks[1]),
        Section::Trending => draw_trending(f, app, chunks[1]),
        Section::Search => draw_search(f, app, chunks[1]),
        Section::Favorites => draw_favorites(f, app, chunks[1]),
        Section::Settings => draw_settings(f, app, chunks[1]),
    }
    draw_status(f, app, chunks[2]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Section::ALL.iter().map(|s| Line::from(s.title())).collect();
    let selected = Section::ALL
        .iter()
        .position(|s| *s == app.section)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(accent(app.theme))
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    f.render_widget(tabs, area);
}

fn article_line(article: &Article, favorited: bool) -> Line<'_> {
    let mut spans = vec![Span::raw(if favorited { "♥ " } else { "  " })];
    spans.push(Span::styled(
        &*article.title,
        Style::default().fg(Color::White),
    ));
    if let Some(source) = article.source_name.as_deref() {
        spans.push(Span::styled(
            format!("  [{}]", source),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn draw_article_list(
    f: &mut Frame,
    area: Rect,
    title: String,
    articles: &[Article],
    favorite_urls: &[String],
    state: &mut ListState,
    theme: Theme,
) {
    let items: Vec<ListItem> = articles
        .iter()
        .map(|a| ListItem::new(article_line(a, favorite_urls.contains(&a.url))))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .bg(accent(theme))
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, area, state);
}

fn draw_feed(f: &mut Frame, app: &mut App, area: Rect) {
    let cols = Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let mut title = format!(" News Feed — {} ", app.category.name());
    if app.feed_loading {
        title.push_str("(loading...) ");
    } else if app.feed_degraded {
        title.push_str("(demo data) ");
    }

    let favorite_urls = app.store.news_favorite_urls();
    let mut feed_state = std::mem::take(&mut app.feed_state);
    draw_article_list(
        f,
        cols[0],
        title,
        &app.feed,
        &favorite_urls,
        &mut feed_state,
        app.theme,
    );
    app.feed_state = feed_state;

    // Detail pane for the selected article
    let detail = app
        .feed_state
        .selected()
        .and_then(|i| app.feed.get(i))
        .map(article_detail)
        .unwrap_or_else(|| vec![Line::from("No article selected")]);
    let pane = Paragraph::new(detail).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Article ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(pane, cols[1]);
}

fn article_detail(article: &Article) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(Span::styled(
            &*article.title,
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
    ];
    if let Some(description) = article.description.as_deref() {
        lines.push(Line::from(description));
        lines.push(Line::from(""));
    }
    if let Some(author) = article.author.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("By {}", author),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if let Some(published) = article.published_at.as_deref() {
        lines.push(Line::from(Span::styled(
            published,
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(Span::styled(
        &*article.url,
        Style::default().fg(Color::Cyan),
    )));
    lines
}

fn draw_trending(f: &mut Frame, app: &mut App, area: Rect) {
    let favorite_urls = app.store.news_favorite_urls();
    let items: Vec<ListItem> = app
        .trending
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let mut line = article_line(a, favorite_urls.contains(&a.url));
            line.spans.insert(
                0,
                Span::styled(format!("#{:<3}", i + 1), Style::default().fg(Color::Green)),
            );
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Trending Now ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .bg(accent(app.theme))
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, area, &mut app.trending_state);
}

fn draw_search(f: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Length(3), // input
        Constraint::Min(4),    // results
    ])
    .split(area);

    let input_title = if app.search_loading {
        " Search (searching...) "
    } else {
        " Search "
    };
    let input = Paragraph::new(app.query.as_str()).block(
        Block::default()
            .title(input_title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(accent(app.theme))),
    );
    f.render_widget(input, rows[0]);

    if app.query.is_empty() {
        draw_search_history(f, app, rows[1]);
        return;
    }

    let cols = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    match app.search_tab {
        ResultTab::News => {
            let favorite_urls = app.store.news_favorite_urls();
            let mut search_state = std::mem::take(&mut app.search_state);
            draw_article_list(
                f,
                cols[0],
                format!(
                    " News ({}) | Music ({}) ",
                    app.news_results.len(),
                    app.track_results.len()
                ),
                &app.news_results,
                &favorite_urls,
                &mut search_state,
                app.theme,
            );
            app.search_state = search_state;
        }
        ResultTab::Music => {
            let items: Vec<ListItem> = app
                .track_results
                .iter()
                .map(|t| {
                    let favorited = app.favorite_track_ids.contains(&t.id);
                    let mut spans = vec![
                        Span::raw(if favorited { "♥ " } else { "  " }),
                        Span::styled(&*t.track_name, Style::default().fg(Color::White)),
                        Span::styled(
                            format!("  {} — {}", t.artist_name, t.format_duration()),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ];
                    if t.instrumental {
                        spans.push(Span::styled(
                            "  [instrumental]",
                            Style::default().fg(Color::Yellow),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .title(format!(
                            " News ({}) | Music ({}) ",
                            app.news_results.len(),
                            app.track_results.len()
                        ))
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(Color::DarkGray)),
                )
                .highlight_style(
                    Style::default()
                        .bg(accent(app.theme))
                        .add_modifier(Modifier::BOLD),
                );
            f.render_stateful_widget(list, cols[0], &mut app.search_state);
        }
    }

    // Lyrics pane
    let lyrics_text = match &app.selected_lyrics {
        Some(l) => {
            let body = l
                .plain_lyrics
                .as_deref()
                .or(l.synced_lyrics.as_deref())
                .unwrap_or(if l.track.instrumental {
                    "(instrumental)"
                } else {
                    "(no lyrics available)"
                });
            format!("{} — {}\n\n{}", l.track.artist_name, l.track.track_name, body)
        }
        None => "Select a track and press Enter to view lyrics".to_string(),
    };
    let pane = Paragraph::new(lyrics_text).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Lyrics ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(pane, cols[1]);
}

fn draw_search_history(f: &mut Frame, app: &App, area: Rect) {
    let history = app.store.search_history();
    let mut lines = vec![Line::from(Span::styled(
        "Recent searches",
        Style::default().fg(Color::DarkGray),
    ))];
    if history.is_empty() {
        lines.push(Line::from("  (none)"));
    } else {
        for query in &history {
            lines.push(Line::from(format!("  {}", query)));
        }
    }
    let pane = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(pane, area);
}

fn draw_favorites(f: &mut Frame, app: &mut App, area: Rect) {
    let title = format!(
        " Favorites — News ({}) | Music ({}) ",
        app.favorite_articles.len(),
        app.favorite_track_ids.len()
    );

    match app.favorites_tab {
        ResultTab::News => {
            let urls: Vec<String> = app.favorite_articles.iter().map(|a| a.url.clone()).collect();
            let mut favorites_state = std::mem::take(&mut app.favorites_state);
            draw_article_list(
                f,
                area,
                title,
                &app.favorite_articles,
                &urls,
                &mut favorites_state,
                app.theme,
            );
            app.favorites_state = favorites_state;
        }
        ResultTab::Music => {
            let items: Vec<ListItem> = app
                .favorite_track_ids
                .iter()
                .map(|id| ListItem::new(format!("♥ Track #{}", id)))
                .collect();
            let list = List::new(items)
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(Color::DarkGray)),
                )
                .highlight_style(
                    Style::default()
                        .bg(accent(app.theme))
                        .add_modifier(Modifier::BOLD),
                );
            f.render_stateful_widget(list, area, &mut app.favorites_state);
        }
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn draw_settings(f: &mut Frame, app: &App, area: Rect) {
    let prefs = app.store.preferences();
    let user_line = match &app.user {
        Some(user) => format!(
            "Signed in as {}",
            user.name.as_deref().unwrap_or("(unnamed)")
        ),
        None => "Not signed in".to_string(),
    };

    let lines = vec![
        Line::from(Span::styled(
            user_line,
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
        Line::from(format!(
            "[m] Theme: {}",
            if app.theme.is_dark() { "dark" } else { "light" }
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Notifications",
            Style::default().fg(accent(app.theme)),
        )),
        Line::from(format!("[e] Email: {}", on_off(prefs.notifications.email))),
        Line::from(format!("[p] Push: {}", on_off(prefs.notifications.push))),
        Line::from(format!(
            "[n] New articles: {}",
            on_off(prefs.notifications.new_articles)
        )),
        Line::from(format!(
            "[g] Trending: {}",
            on_off(prefs.notifications.trending)
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Content",
            Style::default().fg(accent(app.theme)),
        )),
        Line::from(format!(
            "    Language: {}   Region: {}",
            prefs.content.language, prefs.content.region
        )),
        Line::from(format!(
            "[c] Followed categories: {}",
            prefs.content.categories.join(", ")
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Privacy",
            Style::default().fg(accent(app.theme)),
        )),
        Line::from(format!("[a] Analytics: {}", on_off(prefs.privacy.analytics))),
        Line::from(format!(
            "[z] Personalization: {}",
            on_off(prefs.privacy.personalization)
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Data",
            Style::default().fg(accent(app.theme)),
        )),
        Line::from("[x] Export data    [X] Clear all data    [h] Clear search history"),
        Line::from(match app.user {
            Some(_) => "[u] Sign out",
            None => "[u] Sign in",
        }),
    ];

    let pane = Paragraph::new(lines).block(
        Block::default()
            .title(" Settings ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(pane, area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let help = match app.section {
        Section::Feed => "Tab section | ↑↓ select | c category | r refresh | f favorite | q quit",
        Section::Trending => "Tab section | ↑↓ select | r refresh | f favorite | q quit",
        Section::Search => {
            "Tab section | type to search | ←→ tab | Enter favorite/lyrics | Del track fav | Esc clear"
        }
        Section::Favorites => "Tab section | ↑↓ select | t tab | d remove | q quit",
        Section::Settings => "Tab section | lettered keys toggle | q quit",
    };

    let lines = vec![
        Line::from(Span::styled(
            app.status.as_str(),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
