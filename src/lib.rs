//! popcorn - search movies, rate them, keep a watched list
//!
//! A terminal front-end over the OMDb catalog with a persisted watched list.
//!
//! # Modules
//!
//! - `models` - Movie summaries, details, watched entries, fetch results
//! - `api` - The `MovieSource` seam and its OMDb client
//! - `pipeline` - Race-safe search and detail fetch pipelines
//! - `watched` / `storage` - The write-through watched list and its store
//! - `selection` / `keys` / `title` - Selected movie, key bindings, display title
//! - `app` / `ui` - TUI state and rendering
//! - `cli` / `commands` - Scriptable subcommands

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod keys;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod selection;
pub mod storage;
pub mod title;
pub mod ui;
pub mod watched;

// Re-export commonly used types
pub use models::{FetchResult, MovieDetail, MovieSummary, WatchedEntry, WatchedStats};

pub use api::{LookupError, MovieSource, OmdbClient};
pub use app::App;
pub use keys::{KeyBinding, KeyDispatcher};
pub use pipeline::{DetailPipeline, SearchPipeline};
pub use selection::Selection;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use title::{DisplayTitle, TitleGuard};
pub use watched::{WatchedError, WatchedList};
