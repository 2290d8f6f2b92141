use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

/// Identity handed to whichever component needs it. Created only by a
/// successful credential check, torn down only by logout.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub username: String,
    pub started_at: String,
}

/// Holds the single active session. No ambient flags: callers go through
/// `start`/`end`/`current` explicitly.
#[derive(Default)]
pub struct SessionStore {
    current: RwLock<Option<SessionContext>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, username: &str) -> SessionContext {
        let context = SessionContext {
            username: username.to_string(),
            started_at: Utc::now().to_rfc3339(),
        };
        *self.current.write() = Some(context.clone());
        context
    }

    /// Tears down the active session. Returns whether one was active.
    pub fn end(&self) -> bool {
        self.current.write().take().is_some()
    }

    pub fn current(&self) -> Option<SessionContext> {
        self.current.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_replaces_any_previous_session() {
        let store = SessionStore::new();
        store.start("first");
        store.start("second");
        assert_eq!(store.current().unwrap().username, "second");
    }

    #[test]
    fn end_tears_the_session_down() {
        let store = SessionStore::new();
        store.start("admin");
        assert!(store.end());
        assert!(store.current().is_none());
        // a second teardown is a no-op
        assert!(!store.end());
    }

    #[test]
    fn no_session_until_started() {
        assert!(SessionStore::new().current().is_none());
    }
}
