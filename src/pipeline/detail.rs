//! Detail pipeline: selected movie id -> full movie record
//!
//! Besides the fetch itself the pipeline owns the per-selection rating session
//! (current rating and how many times the user changed their mind) and the
//! display-title effect while a movie is open.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::fetch::FetchSlot;
use crate::api::{FailureKind, MovieSource};
use crate::models::{FetchResult, MovieDetail, WatchedEntry, MAX_USER_RATING};
use crate::title::{DisplayTitle, TitleGuard};

/// Rating value meaning "not rated yet"
pub const NEUTRAL_RATING: u8 = 0;

pub struct DetailPipeline {
    source: Arc<dyn MovieSource>,
    selected: Option<String>,
    slot: FetchSlot<MovieDetail>,
    user_rating: u8,
    rating_decisions: u32,
    title: DisplayTitle,
    title_guard: Option<TitleGuard>,
}

impl DetailPipeline {
    pub fn new(source: Arc<dyn MovieSource>, title: DisplayTitle, timeout: Duration) -> Self {
        Self {
            source,
            selected: None,
            slot: FetchSlot::new("detail", FetchResult::Idle, timeout),
            user_rating: NEUTRAL_RATING,
            rating_decisions: 0,
            title,
            title_guard: None,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn state(&self) -> &FetchResult<MovieDetail> {
        self.slot.state()
    }

    /// Why the last fetch failed, if it did
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.slot.failure_kind()
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        self.slot.state().data()
    }

    pub fn user_rating(&self) -> u8 {
        self.user_rating
    }

    pub fn rating_decisions(&self) -> u32 {
        self.rating_decisions
    }

    /// Follow the selection; a changed id tears down the previous view
    pub fn select(&mut self, id: Option<&str>) {
        if self.selected.as_deref() == id {
            return;
        }

        self.title_guard = None;
        self.user_rating = NEUTRAL_RATING;
        self.rating_decisions = 0;
        self.selected = id.map(str::to_string);

        match id {
            None => self.slot.resolve_now(FetchResult::Idle),
            Some(id) => {
                debug!(%id, "loading movie detail");
                let source = Arc::clone(&self.source);
                let id = id.to_string();
                self.slot.start(async move { source.detail(&id).await });
            }
        }
    }

    pub fn close(&mut self) {
        self.select(None);
    }

    /// Record the user's rating; returns true if it changed
    ///
    /// Each move to a new non-neutral value counts as one rating decision.
    /// Values above the scale and ratings without a selection are ignored.
    pub fn rate(&mut self, value: u8) -> bool {
        if self.selected.is_none() || value > MAX_USER_RATING || value == self.user_rating {
            return false;
        }
        self.user_rating = value;
        if value != NEUTRAL_RATING {
            self.rating_decisions += 1;
        }
        true
    }

    /// Entry to add to the watched list, once loaded and rated
    pub fn watched_entry(&self) -> Option<WatchedEntry> {
        if self.user_rating == NEUTRAL_RATING {
            return None;
        }
        self.detail()
            .map(|detail| WatchedEntry::from_detail(detail, self.user_rating, self.rating_decisions))
    }

    /// Apply finished requests; true if the visible state changed
    pub fn poll(&mut self) -> bool {
        let changed = self.slot.poll();
        if changed {
            self.sync_title();
        }
        changed
    }

    /// Wait for the current selection to resolve
    pub async fn settle(&mut self) -> &FetchResult<MovieDetail> {
        self.slot.settle().await;
        self.sync_title();
        self.slot.state()
    }

    fn sync_title(&mut self) {
        if self.title_guard.is_some() {
            return;
        }
        if let FetchResult::Success(detail) = self.slot.state() {
            if !detail.title.is_empty() {
                self.title_guard = Some(self.title.acquire(format!("Movie | {}", detail.title)));
            }
        }
    }
}
