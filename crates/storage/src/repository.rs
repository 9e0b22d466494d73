//! Repository Implementation

use crate::summary::{SessionSummary, WeekdaySessionSummary, YogaSessionSummary};
use crate::{SessionPersister, StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// A stored session summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
    pub summary: SessionSummary,
}

struct Inner {
    sessions: VecDeque<SessionRecord>,
    next_id: i64,
}

/// Repository for session summaries (in-memory implementation)
pub struct Repository {
    inner: Mutex<Inner>,
    /// Oldest sessions are dropped past this many
    max_records: usize,
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::with_retention(10_000)
    }

    pub fn with_retention(max_records: usize) -> Self {
        info!("Creating in-memory repository (retention {})", max_records);
        Self {
            inner: Mutex::new(Inner {
                sessions: VecDeque::new(),
                next_id: 1,
            }),
            max_records: max_records.max(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Backend(format!("Lock error: {}", e)))
    }

    /// Insert a summary stamped with the current time
    pub fn insert(&self, summary: SessionSummary) -> Result<i64, StorageError> {
        self.insert_at(summary, Utc::now())
    }

    /// Insert a summary with an explicit timestamp
    pub fn insert_at(
        &self,
        summary: SessionSummary,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        let mut inner = self.lock()?;

        let id = inner.next_id;
        inner.next_id += 1;

        // Enforce retention
        while inner.sessions.len() >= self.max_records {
            inner.sessions.pop_front();
        }

        inner.sessions.push_back(SessionRecord {
            id,
            recorded_at,
            summary,
        });
        debug!("Inserted session with ID {}", id);
        Ok(id)
    }

    pub fn get(&self, id: i64) -> Result<SessionRecord, StorageError> {
        let inner = self.lock()?;
        inner
            .sessions
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    /// All sessions, newest first
    pub fn combined_history(&self, limit: usize) -> Result<Vec<SessionRecord>, StorageError> {
        let inner = self.lock()?;
        let mut records: Vec<_> = inner.sessions.iter().cloned().collect();
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));
        records.truncate(limit);
        Ok(records)
    }

    /// Weekday sessions, newest first
    pub fn weekday_history(
        &self,
        limit: usize,
    ) -> Result<Vec<(DateTime<Utc>, WeekdaySessionSummary)>, StorageError> {
        Ok(self
            .combined_history(usize::MAX)?
            .into_iter()
            .filter_map(|r| match r.summary {
                SessionSummary::Weekday(s) => Some((r.recorded_at, s)),
                SessionSummary::Yoga(_) => None,
            })
            .take(limit)
            .collect())
    }

    /// Yoga sessions, newest first
    pub fn yoga_history(
        &self,
        limit: usize,
    ) -> Result<Vec<(DateTime<Utc>, YogaSessionSummary)>, StorageError> {
        Ok(self
            .combined_history(usize::MAX)?
            .into_iter()
            .filter_map(|r| match r.summary {
                SessionSummary::Yoga(s) => Some((r.recorded_at, s)),
                SessionSummary::Weekday(_) => None,
            })
            .take(limit)
            .collect())
    }

    /// Get total session count
    pub fn session_count(&self) -> usize {
        self.inner.lock().map(|i| i.sessions.len()).unwrap_or(0)
    }

    /// Clear all data
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.sessions.clear();
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionPersister for Repository {
    fn save(&self, summary: SessionSummary) -> Result<i64, StorageError> {
        let duration = summary.duration_secs();
        let id = self.insert(summary)?;
        info!("Session {} saved ({}s)", id, duration);
        Ok(id)
    }
}
