//! Currently selected movie

/// Which movie (if any) is open in the detail view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Open `id`, or close it if it is already open
    pub fn select(&mut self, id: &str) {
        if self.current.as_deref() == Some(id) {
            self.current = None;
        } else {
            self.current = Some(id.to_string());
        }
    }

    pub fn close(&mut self) {
        self.current = None;
    }
}
