//! Generation-tagged fetch slot
//!
//! Each request is spawned as a tokio task and reports back over a channel,
//! tagged with the generation that issued it. Starting a new request (or
//! resolving the slot synchronously) bumps the generation, aborts the old task
//! and makes any completion still in the channel stale. Stale completions are
//! dropped when applied, so results land in input order, never arrival order.
//!
//! A task that ends without sending (it panicked) is reaped through its
//! `JoinHandle` and settles the slot as a failure.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use crate::api::{FailureKind, LookupError};
use crate::models::FetchResult;

/// Result of one spawned request
#[derive(Debug)]
pub struct Completion<T> {
    pub generation: u64,
    pub outcome: Result<T, LookupError>,
}

enum Wake<T> {
    Completion(Option<Completion<T>>),
    Ended(Result<(), JoinError>),
}

/// Holds the latest [`FetchResult`] for one logical input
pub struct FetchSlot<T> {
    label: &'static str,
    generation: u64,
    state: FetchResult<T>,
    failure: Option<FailureKind>,
    in_flight: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Completion<T>>,
    rx: mpsc::UnboundedReceiver<Completion<T>>,
    timeout: Duration,
}

impl<T: Send + 'static> FetchSlot<T> {
    pub fn new(label: &'static str, initial: FetchResult<T>, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            label,
            generation: 0,
            state: initial,
            failure: None,
            in_flight: None,
            tx,
            rx,
            timeout,
        }
    }

    pub fn state(&self) -> &FetchResult<T> {
        &self.state
    }

    /// Class of the current failure, `None` unless the state is `Failure`
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure
    }

    /// Spawn `request` as the current generation; the slot goes to `Loading`
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&mut self, request: F) -> u64
    where
        F: Future<Output = Result<T, LookupError>> + Send + 'static,
    {
        let generation = self.invalidate();
        self.state = FetchResult::Loading;

        let tx = self.tx.clone();
        let limit = self.timeout;
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = match tokio::time::timeout(limit, request).await {
                Ok(outcome) => outcome,
                Err(_) => Err(LookupError::Timeout(limit)),
            };
            // The slot may have been dropped in the meantime
            let _ = tx.send(Completion {
                generation,
                outcome,
            });
        }));

        generation
    }

    /// Settle the slot without a request, superseding anything in flight
    pub fn resolve_now(&mut self, state: FetchResult<T>) {
        self.invalidate();
        self.state = state;
    }

    /// Apply a completion if it belongs to the current generation
    ///
    /// Returns false when the completion was stale and got discarded.
    pub fn apply(&mut self, completion: Completion<T>) -> bool {
        if completion.generation != self.generation {
            debug!(
                slot = self.label,
                stale = completion.generation,
                current = self.generation,
                "discarding stale result"
            );
            return false;
        }

        self.in_flight = None;
        match completion.outcome {
            Ok(data) => self.state = FetchResult::Success(data),
            Err(err) => {
                if err.is_malformed() {
                    warn!(slot = self.label, malformed_response = %err, "upstream sent an unreadable payload");
                } else {
                    debug!(slot = self.label, error = %err, "fetch failed");
                }
                self.fail(&err);
            }
        }
        true
    }

    /// Drain finished requests without waiting; true if the state changed
    pub fn poll(&mut self) -> bool {
        // Checked before draining: a task that finished by now has either
        // sent its completion already or never will
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|handle| handle.is_finished());

        let changed = self.drain();
        if finished && self.state.is_loading() {
            return self.reap("request task stopped".to_string()) || changed;
        }
        changed
    }

    /// Wait until the current generation has resolved
    pub async fn settle(&mut self) -> &FetchResult<T> {
        while self.state.is_loading() {
            let wake = match self.in_flight.as_mut() {
                Some(handle) => tokio::select! {
                    completion = self.rx.recv() => Wake::Completion(completion),
                    joined = handle => Wake::Ended(joined),
                },
                // Loading with nothing in flight can never resolve
                None => break,
            };

            match wake {
                Wake::Completion(Some(completion)) => {
                    self.apply(completion);
                }
                Wake::Completion(None) => break,
                Wake::Ended(joined) => {
                    let reason = match joined {
                        Err(err) if err.is_panic() => "request panicked".to_string(),
                        Err(err) => err.to_string(),
                        Ok(()) => "request task stopped".to_string(),
                    };
                    self.reap(reason);
                }
            }
        }
        &self.state
    }

    fn drain(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.rx.try_recv() {
            changed |= self.apply(completion);
        }
        changed
    }

    /// Settle after the current task ended; its completion may still be queued
    fn reap(&mut self, reason: String) -> bool {
        self.in_flight = None;
        let changed = self.drain();
        if !self.state.is_loading() {
            return changed;
        }

        let err = LookupError::TaskFailed(reason);
        warn!(slot = self.label, error = %err, "request ended without a result");
        self.fail(&err);
        true
    }

    fn fail(&mut self, err: &LookupError) {
        self.failure = Some(err.kind());
        self.state = FetchResult::Failure(err.user_message());
    }

    fn invalidate(&mut self) -> u64 {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.failure = None;
        self.generation += 1;
        self.generation
    }
}

impl<T> Drop for FetchSlot<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
