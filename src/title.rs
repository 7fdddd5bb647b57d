//! Process-wide display title
//!
//! One shared string slot with a known default. Writers take a [`TitleGuard`];
//! dropping the guard puts the default back. Only the most recent guard may
//! restore, so an old guard dropped late never clobbers a newer title.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Title shown when no movie is open
pub const DEFAULT_TITLE: &str = "usePopcorn";

#[derive(Debug)]
struct TitleState {
    current: String,
    default: String,
    holder: u64,
}

/// Cloneable handle to the shared title slot
#[derive(Debug, Clone)]
pub struct DisplayTitle {
    inner: Arc<Mutex<TitleState>>,
}

impl Default for DisplayTitle {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl DisplayTitle {
    pub fn new(default: impl Into<String>) -> Self {
        let default = default.into();
        Self {
            inner: Arc::new(Mutex::new(TitleState {
                current: default.clone(),
                default,
                holder: 0,
            })),
        }
    }

    /// Current title
    pub fn get(&self) -> String {
        self.lock().current.clone()
    }

    pub fn default_title(&self) -> String {
        self.lock().default.clone()
    }

    pub fn is_default(&self) -> bool {
        let state = self.lock();
        state.current == state.default
    }

    /// Set the title until the returned guard is dropped
    pub fn acquire(&self, title: impl Into<String>) -> TitleGuard {
        let mut state = self.lock();
        state.holder += 1;
        state.current = title.into();
        TitleGuard {
            title: self.clone(),
            token: state.holder,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TitleState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Restores the default title on drop
#[derive(Debug)]
#[must_use = "the title is restored as soon as the guard is dropped"]
pub struct TitleGuard {
    title: DisplayTitle,
    token: u64,
}

impl Drop for TitleGuard {
    fn drop(&mut self) {
        let mut state = self.title.lock();
        if state.holder == self.token {
            state.current = state.default.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_restores_default() {
        let title = DisplayTitle::default();
        assert_eq!(title.get(), "usePopcorn");

        let guard = title.acquire("Movie | Inception");
        assert_eq!(title.get(), "Movie | Inception");
        assert!(!title.is_default());

        drop(guard);
        assert_eq!(title.get(), "usePopcorn");
        assert!(title.is_default());
    }

    #[test]
    fn test_stale_guard_does_not_clobber_newer_title() {
        let title = DisplayTitle::new("home");
        let first = title.acquire("one");
        let second = title.acquire("two");

        drop(first);
        assert_eq!(title.get(), "two");

        drop(second);
        assert_eq!(title.get(), "home");
    }

    #[test]
    fn test_clones_share_slot() {
        let title = DisplayTitle::new("home");
        let other = title.clone();
        let _guard = title.acquire("shared");
        assert_eq!(other.get(), "shared");
        assert_eq!(other.default_title(), "home");
    }
}
