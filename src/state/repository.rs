//! Storage interface for viewer snapshots.
//!
//! The viewer never reaches for ambient storage. A host that wants viewer
//! state to survive between openings injects a [`SessionRepository`] and calls
//! [`ViewerSession::save_to`](crate::ViewerSession::save_to) /
//! [`ViewerSession::restore_from`](crate::ViewerSession::restore_from).

use std::collections::HashMap;

use super::ViewerSnapshot;
use crate::error::SessionError;

/// Keyed storage for viewer snapshots, usually keyed by image id or URL.
pub trait SessionRepository {
    fn load(&self, key: &str) -> Result<Option<ViewerSnapshot>, SessionError>;
    fn save(&mut self, key: &str, snapshot: &ViewerSnapshot) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

/// Repository holding serialized snapshots in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    entries: HashMap<String, String>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn load(&self, key: &str) -> Result<Option<ViewerSnapshot>, SessionError> {
        self.entries
            .get(key)
            .map(|json| ViewerSnapshot::from_json(json))
            .transpose()
    }

    fn save(&mut self, key: &str, snapshot: &ViewerSnapshot) -> Result<(), SessionError> {
        let json = snapshot.to_json()?;
        self.entries.insert(key.to_string(), json);
        log::debug!("Stored viewer snapshot for {}", key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.entries.remove(key);
        Ok(())
    }
}
