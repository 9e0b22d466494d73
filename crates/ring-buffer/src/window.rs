//! Time-bounded event window

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Timestamps retained for a trailing time span.
///
/// Entries are kept in non-decreasing order; a timestamp earlier than the
/// newest entry is clamped to it so the order invariant always holds.
#[derive(Debug, Clone)]
pub struct TimeWindow {
    events: VecDeque<Instant>,
    span: Duration,
}

impl TimeWindow {
    pub fn new(span: Duration) -> Self {
        Self {
            events: VecDeque::new(),
            span,
        }
    }

    /// Record an event
    pub fn record(&mut self, at: Instant) {
        let at = match self.events.back() {
            Some(&last) if at < last => last,
            _ => at,
        };
        self.events.push_back(at);
    }

    /// Drop events older than the span relative to `now`
    pub fn evict(&mut self, now: Instant) {
        while let Some(&oldest) = self.events.front() {
            if now.saturating_duration_since(oldest) > self.span {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }

    /// Evict, then count what remains
    pub fn count(&mut self, now: Instant) -> usize {
        self.evict(now);
        self.events.len()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
