//! Global key bindings
//!
//! [`KeyDispatcher`] is the process-wide key-press stream; [`KeyBinding`] is a
//! scoped listener on it. A binding is removed when it is dropped, and
//! replacing its handler uninstalls the old listener before the new one goes
//! in, so one binding never owns two listeners.

use crossterm::event::KeyCode;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Listener callback
pub type KeyHandler = Box<dyn FnMut() + Send>;

struct Listener {
    id: u64,
    key: KeyCode,
    handler: KeyHandler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<Listener>,
}

/// Fan-out of key presses to bound listeners
///
/// Handlers run while the registry is locked, so they must not bind or
/// unbind keys themselves; send a message instead.
#[derive(Clone, Default)]
pub struct KeyDispatcher {
    inner: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for KeyDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyDispatcher")
            .field("listeners", &self.lock().listeners.len())
            .finish()
    }
}

impl KeyDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every listener bound to `key`; returns how many ran
    pub fn dispatch(&self, key: KeyCode) -> usize {
        let mut registry = self.lock();
        let mut handled = 0;
        for listener in registry.listeners.iter_mut().filter(|l| l.key == key) {
            (listener.handler)();
            handled += 1;
        }
        handled
    }

    /// Number of listeners currently bound to `key`
    pub fn listener_count(&self, key: KeyCode) -> usize {
        self.lock().listeners.iter().filter(|l| l.key == key).count()
    }

    fn install(&self, key: KeyCode, handler: KeyHandler) -> u64 {
        let mut registry = self.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.listeners.push(Listener { id, key, handler });
        id
    }

    fn uninstall(&self, id: u64) {
        self.lock().listeners.retain(|l| l.id != id);
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A listener for one key, removed on drop
#[must_use = "the binding is removed as soon as it is dropped"]
pub struct KeyBinding {
    dispatcher: KeyDispatcher,
    key: KeyCode,
    id: u64,
}

impl KeyBinding {
    pub fn bind<F>(dispatcher: &KeyDispatcher, key: KeyCode, handler: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let id = dispatcher.install(key, Box::new(handler));
        Self {
            dispatcher: dispatcher.clone(),
            key,
            id,
        }
    }

    pub fn key(&self) -> KeyCode {
        self.key
    }

    /// Swap the handler; the old listener is gone before the new one is added
    pub fn replace<F>(&mut self, handler: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.dispatcher.uninstall(self.id);
        self.id = self.dispatcher.install(self.key, Box::new(handler));
    }
}

impl Drop for KeyBinding {
    fn drop(&mut self) {
        self.dispatcher.uninstall(self.id);
    }
}

impl std::fmt::Debug for KeyBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyBinding")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}
