//! Data structures and types for popcorn
//!
//! Contains the shared models used across the application, organized by domain:
//! - **Catalog**: OMDb search summaries and full movie details
//! - **Watched**: persisted watched-list entries and their derived statistics
//! - **Fetch**: the tri-state result every fetch pipeline exposes

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Catalog Models (OMDb)
// =============================================================================

/// A single hit from a catalog search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
}

impl fmt::Display for MovieSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.title, self.year, self.id)
    }
}

/// Full movie record, fetched lazily for the current selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub runtime_minutes: u32,
    pub imdb_rating: f64,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

impl MovieDetail {
    /// Runtime as "2h 28m"
    pub fn format_runtime(&self) -> String {
        let hours = self.runtime_minutes / 60;
        let mins = self.runtime_minutes % 60;
        if hours > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}m", mins)
        }
    }
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {} min - ⭐ {:.1}",
            self.title, self.year, self.runtime_minutes, self.imdb_rating
        )
    }
}

// =============================================================================
// Watched Models
// =============================================================================

/// Lowest rating a user can give
pub const MIN_USER_RATING: u8 = 1;

/// Highest rating a user can give
pub const MAX_USER_RATING: u8 = 10;

/// A movie the user has watched and rated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedEntry {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub imdb_rating: f64,
    pub runtime_minutes: u32,
    pub user_rating: u8,
    pub rating_decision_count: u32,
}

impl WatchedEntry {
    /// Build an entry from a loaded detail and the user's rating session
    pub fn from_detail(detail: &MovieDetail, user_rating: u8, rating_decision_count: u32) -> Self {
        Self {
            id: detail.id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            imdb_rating: detail.imdb_rating,
            runtime_minutes: detail.runtime_minutes,
            user_rating,
            rating_decision_count,
        }
    }
}

impl fmt::Display for WatchedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - ⭐ {:.1} - 🌟 {} - {} min",
            self.title, self.year, self.imdb_rating, self.user_rating, self.runtime_minutes
        )
    }
}

/// Aggregate statistics over the watched list, always derived
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WatchedStats {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime: f64,
}

impl WatchedStats {
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_imdb_rating: average(entries.iter().map(|e| e.imdb_rating)),
            avg_user_rating: average(entries.iter().map(|e| f64::from(e.user_rating))),
            avg_runtime: average(entries.iter().map(|e| f64::from(e.runtime_minutes))),
        }
    }
}

impl fmt::Display for WatchedStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#️⃣ {} movies  ⭐ {:.2}  🌟 {:.2}  ⏳ {:.0} min",
            self.count, self.avg_imdb_rating, self.avg_user_rating, self.avg_runtime
        )
    }
}

/// Arithmetic mean, 0 for an empty sequence
fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

// =============================================================================
// Fetch Result
// =============================================================================

/// Tri-state result of an async fetch (plus the not-started state)
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult<T> {
    /// Nothing requested
    Idle,
    /// Request in flight
    Loading,
    /// Request completed with data
    Success(T),
    /// Request failed, with a user-facing reason
    Failure(String),
}

impl<T> Default for FetchResult<T> {
    fn default() -> Self {
        FetchResult::Idle
    }
}

impl<T> FetchResult<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, FetchResult::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchResult::Loading)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FetchResult::Failure(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchResult::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchResult::Failure(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Parsing Helpers
// =============================================================================

/// Parse the leading numeric token of a formatted value ("142 min" -> 142.0)
///
/// Returns `None` for "N/A" and other values that don't start with a number.
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let re = regex::Regex::new(r"^\s*(\d+(?:\.\d+)?)").ok()?;
    re.captures(s)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// =============================================================================
// Unit Tests
// =============================================================================
