//! Viewer state persistence boundary.

mod repository;
mod snapshot;

pub use repository::{InMemorySessionRepository, SessionRepository};
pub use snapshot::{SNAPSHOT_VERSION, ViewerSnapshot};
