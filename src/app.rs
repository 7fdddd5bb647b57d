//! App state and core application logic
//!
//! Ties the search and detail pipelines, the selection and the watched list
//! together, and translates key events into their inputs.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::MovieSource;
use crate::keys::{KeyBinding, KeyDispatcher};
use crate::models::{MovieSummary, WatchedEntry, MAX_USER_RATING};
use crate::pipeline::{DetailPipeline, SearchPipeline, NEUTRAL_RATING};
use crate::selection::Selection;
use crate::storage::Storage;
use crate::title::{DisplayTitle, DEFAULT_TITLE};
use crate::watched::WatchedList;

// =============================================================================
// Input Mode / Focus
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

/// Which list receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Results,
    Watched,
}

/// Messages sent by key bindings back to the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    FocusSearch,
    CloseMovie,
}

/// Key that focuses the search box
pub const FOCUS_SEARCH_KEY: KeyCode = KeyCode::Char('/');

// =============================================================================
// Selection State (per-list)
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    /// Move selection up
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Search Box State
// =============================================================================

/// Search box contents; `cursor` counts characters, not bytes
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub cursor: usize,
    /// Results list state
    pub list: ListState,
}

impl SearchState {
    fn byte_index(&self, cursor: usize) -> usize {
        self.query
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.query.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.query.remove(idx);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let idx = self.byte_index(self.cursor);
            self.query.remove(idx);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Clear query
    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// List receiving navigation keys
    pub focus: Focus,
    /// Global error message
    pub error: Option<String>,

    pub search: SearchState,
    pub watched_list: ListState,

    pub search_pipeline: SearchPipeline,
    pub selection: Selection,
    pub detail: DetailPipeline,
    pub watched: WatchedList,

    title: DisplayTitle,
    keys: KeyDispatcher,
    actions_tx: Sender<Action>,
    actions_rx: Receiver<Action>,
    _focus_search: KeyBinding,
    close_movie: Option<KeyBinding>,
}

impl App {
    /// Create the app, hydrating the watched list from `storage`
    pub fn new(source: Arc<dyn MovieSource>, storage: Box<dyn Storage>, timeout: Duration) -> Self {
        let title = DisplayTitle::new(DEFAULT_TITLE);
        let keys = KeyDispatcher::new();
        let (actions_tx, actions_rx) = mpsc::channel();

        let tx = actions_tx.clone();
        let focus_search = KeyBinding::bind(&keys, FOCUS_SEARCH_KEY, move || {
            let _ = tx.send(Action::FocusSearch);
        });

        let watched = WatchedList::hydrate(storage);
        let watched_list = ListState::new(watched.len());

        Self {
            running: true,
            input_mode: InputMode::Normal,
            focus: Focus::Results,
            error: None,
            search: SearchState::default(),
            watched_list,
            search_pipeline: SearchPipeline::new(Arc::clone(&source), timeout),
            selection: Selection::new(),
            detail: DetailPipeline::new(source, title.clone(), timeout),
            watched,
            title,
            keys,
            actions_tx,
            actions_rx,
            _focus_search: focus_search,
            close_movie: None,
        }
    }

    /// Handle to the display title
    pub fn title(&self) -> &DisplayTitle {
        &self.title
    }

    /// Key-press stream the app's bindings live on
    pub fn keys(&self) -> &KeyDispatcher {
        &self.keys
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Stop the app and release what it holds open; the display title is
    /// back at its default afterwards
    pub fn shutdown(&mut self) {
        self.close_movie();
        self.running = false;
    }

    /// Set error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Currently highlighted search result
    pub fn highlighted_result(&self) -> Option<&MovieSummary> {
        self.search_pipeline.results().get(self.search.list.selected)
    }

    /// Currently highlighted watched entry
    pub fn highlighted_watched(&self) -> Option<&WatchedEntry> {
        self.watched.entries().get(self.watched_list.selected)
    }

    /// Rating shown for the open movie if it is already in the watched list
    pub fn watched_rating(&self) -> Option<u8> {
        self.selection
            .current()
            .and_then(|id| self.watched.user_rating_for(id))
    }

    // -------------------------------------------------------------------------
    // Core inputs
    // -------------------------------------------------------------------------

    /// Replace the query and feed it to the search pipeline
    pub fn set_query(&mut self, query: &str) {
        self.search.query = query.to_string();
        self.search.cursor_end();
        self.search_pipeline.set_query(&self.search.query);
    }

    /// Open `id`, or close it if it is already open
    pub fn select_movie(&mut self, id: &str) {
        self.selection.select(id);
        self.sync_selection();
    }

    pub fn close_movie(&mut self) {
        self.selection.close();
        self.sync_selection();
    }

    /// Rate the open movie; ignored for movies already watched
    pub fn rate(&mut self, value: u8) -> bool {
        if self.watched_rating().is_some() || self.detail.detail().is_none() {
            return false;
        }
        self.detail.rate(value)
    }

    /// Add the open movie to the watched list, then close it
    pub fn add_watched(&mut self) -> bool {
        let Some(entry) = self.detail.watched_entry() else {
            return false;
        };

        match self.watched.append(entry) {
            Ok(entries) => {
                self.watched_list.set_len(entries.len());
                self.close_movie();
                true
            }
            Err(e) => {
                warn!(error = %e, "could not add watched movie");
                self.set_error(e.to_string());
                false
            }
        }
    }

    /// Remove `id` from the watched list
    pub fn remove_watched(&mut self, id: &str) -> bool {
        match self.watched.remove(id) {
            Ok(entries) => {
                self.watched_list.set_len(entries.len());
                true
            }
            Err(e) => {
                warn!(error = %e, "could not remove watched movie");
                self.set_error(e.to_string());
                false
            }
        }
    }

    /// Focus the search box and clear the query, unless already focused
    pub fn focus_search(&mut self) {
        if self.input_mode == InputMode::Editing {
            return;
        }
        self.input_mode = InputMode::Editing;
        self.search.clear();
        self.search_pipeline.set_query("");
    }

    fn sync_selection(&mut self) {
        self.detail.select(self.selection.current());

        if self.selection.is_open() {
            if self.close_movie.is_none() {
                let tx = self.actions_tx.clone();
                self.close_movie = Some(KeyBinding::bind(&self.keys, KeyCode::Esc, move || {
                    let _ = tx.send(Action::CloseMovie);
                }));
            }
        } else {
            self.close_movie = None;
        }
    }

    fn drain_actions(&mut self) {
        while let Ok(action) = self.actions_rx.try_recv() {
            debug!(?action, "key binding fired");
            match action {
                Action::FocusSearch => self.focus_search(),
                Action::CloseMovie => self.close_movie(),
            }
        }
    }

    // -------------------------------------------------------------------------
    // Event loop hooks
    // -------------------------------------------------------------------------

    /// Apply finished fetches; true if anything visible changed
    pub fn tick(&mut self) -> bool {
        let searched = self.search_pipeline.poll();
        if searched {
            self.search.list = ListState::new(self.search_pipeline.results().len());
        }
        let detailed = self.detail.poll();
        searched || detailed
    }

    /// Wait for both pipelines to resolve
    pub async fn settle(&mut self) {
        self.search_pipeline.settle().await;
        self.search.list = ListState::new(self.search_pipeline.results().len());
        self.detail.settle().await;
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Clear error on any keypress
        self.error = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else {
            self.handle_normal_key(key)
        }
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        let edited = match key.code {
            // Esc only leaves the search box; an open movie stays open
            KeyCode::Esc | KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                return true;
            }
            KeyCode::Char(c) => {
                self.search.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.search.backspace();
                true
            }
            KeyCode::Delete => {
                self.search.delete();
                true
            }
            KeyCode::Left => {
                self.search.cursor_left();
                false
            }
            KeyCode::Right => {
                self.search.cursor_right();
                false
            }
            KeyCode::Home => {
                self.search.cursor_home();
                false
            }
            KeyCode::End => {
                self.search.cursor_end();
                false
            }
            _ => return false,
        };

        if edited {
            self.search_pipeline.set_query(&self.search.query);
        }
        true
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        if self.keys.dispatch(key.code) > 0 {
            self.drain_actions();
            return true;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                true
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Results => Focus::Watched,
                    Focus::Watched => Focus::Results,
                };
                true
            }
            KeyCode::Char('r') => {
                self.search_pipeline.refresh();
                true
            }
            KeyCode::Char(c @ '0'..='9') if self.selection.is_open() => {
                let value = match c {
                    '0' => MAX_USER_RATING,
                    _ => c as u8 - b'0',
                };
                self.rate(value);
                true
            }
            KeyCode::Backspace if self.selection.is_open() => {
                self.rate(NEUTRAL_RATING);
                true
            }
            KeyCode::Char('a') if self.selection.is_open() => {
                self.add_watched();
                true
            }
            _ => match self.focus {
                Focus::Results => self.handle_results_key(key),
                Focus::Watched => self.handle_watched_key(key),
            },
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.search.list.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.search.list.down();
                true
            }
            KeyCode::Home => {
                self.search.list.first();
                true
            }
            KeyCode::End => {
                self.search.list.last();
                true
            }
            KeyCode::Enter => {
                if let Some(id) = self.highlighted_result().map(|m| m.id.clone()) {
                    self.select_movie(&id);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_watched_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.watched_list.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.watched_list.down();
                true
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.highlighted_watched().map(|e| e.id.clone()) {
                    self.remove_watched(&id);
                }
                true
            }
            _ => false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
