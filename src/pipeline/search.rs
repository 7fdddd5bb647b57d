//! Search pipeline: query string -> list of movie summaries

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::fetch::FetchSlot;
use crate::api::{FailureKind, MovieSource};
use crate::models::{FetchResult, MovieSummary};

/// Queries shorter than this never hit the network
pub const MIN_QUERY_LEN: usize = 3;

/// Turns the current query into a race-safe fetch of matching movies
pub struct SearchPipeline {
    source: Arc<dyn MovieSource>,
    query: String,
    slot: FetchSlot<Vec<MovieSummary>>,
}

impl SearchPipeline {
    pub fn new(source: Arc<dyn MovieSource>, timeout: Duration) -> Self {
        Self {
            source,
            query: String::new(),
            slot: FetchSlot::new("search", FetchResult::Success(Vec::new()), timeout),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &FetchResult<Vec<MovieSummary>> {
        self.slot.state()
    }

    /// Why the last fetch failed, if it did
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.slot.failure_kind()
    }

    /// Current results, empty unless the last search succeeded
    pub fn results(&self) -> &[MovieSummary] {
        self.slot.state().data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Feed a new query value; no-op if it equals the current one
    pub fn set_query(&mut self, query: &str) {
        if query == self.query {
            return;
        }
        self.query = query.to_string();
        self.issue();
    }

    /// Re-run the current query
    pub fn refresh(&mut self) {
        self.issue();
    }

    /// Apply finished requests; true if the visible state changed
    pub fn poll(&mut self) -> bool {
        self.slot.poll()
    }

    /// Wait for the current query to resolve
    pub async fn settle(&mut self) -> &FetchResult<Vec<MovieSummary>> {
        self.slot.settle().await
    }

    fn issue(&mut self) {
        let query = self.query.trim().to_string();
        if query.chars().count() < MIN_QUERY_LEN {
            self.slot.resolve_now(FetchResult::Success(Vec::new()));
            return;
        }

        debug!(%query, "searching catalog");
        let source = Arc::clone(&self.source);
        self.slot.start(async move { source.search(&query).await });
    }
}
