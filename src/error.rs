//! Error types for session storage.
//!
//! Geometry never fails: mapping functions return `Option` and callers skip the
//! update on `None`. Configuration errors live in [`crate::config`].

use thiserror::Error;

/// Errors raised by a [`SessionRepository`](crate::state::SessionRepository).
#[derive(Error, Debug)]
pub enum SessionError {
    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot was produced by a newer version
    #[error("Snapshot version {found} is newer than supported version {supported}")]
    VersionTooNew {
        /// Version found in the snapshot
        found: u32,
        /// Highest version this build understands
        supported: u32,
    },

    /// No image is loaded, so there is no key to store under
    #[error("No image loaded")]
    NoImage,
}
