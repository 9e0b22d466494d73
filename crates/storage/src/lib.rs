//! Storage Layer
//!
//! Persists end-of-session summaries behind the `SessionPersister` seam,
//! with an in-memory repository and history queries.

mod repository;
mod summary;

pub use repository::{Repository, SessionRecord};
pub use summary::{SessionSummary, WeekdaySessionSummary, YogaSessionSummary};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("Record not found")]
    NotFound,
}

/// Receiver of completed session summaries
pub trait SessionPersister: Send + Sync {
    /// Store a summary, returning its record id
    fn save(&self, summary: SessionSummary) -> Result<i64, StorageError>;
}
