//! Pose lock and hold timer
//!
//! A label seen on enough consecutive frames locks; the locked pose is then
//! held for a fixed number of seconds while classification is ignored.

use crate::classifier::PoseLabel;
use crate::config::YogaConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

/// Where the lock is after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LockPhase {
    /// Collecting consecutive sightings
    Observing,
    /// Lock taken on this frame
    Locked,
    /// Holding the locked pose
    Holding { remaining_secs: u64 },
    /// Hold finished on this frame; back to observing
    Completed,
}

/// Consecutive-sighting lock with a hold countdown
#[derive(Debug, Clone)]
pub struct PoseLock {
    stability_frames: u32,
    hold_seconds: u64,
    candidate: PoseLabel,
    counter: u32,
    locked: Option<(PoseLabel, Instant)>,
    holds_completed: BTreeMap<PoseLabel, u32>,
}

impl PoseLock {
    pub fn new(config: &YogaConfig) -> Self {
        Self {
            stability_frames: config.stability_frames,
            hold_seconds: config.hold_seconds,
            candidate: PoseLabel::Unknown,
            counter: 0,
            locked: None,
            holds_completed: BTreeMap::new(),
        }
    }

    /// Advance with this frame's label
    pub fn observe(&mut self, label: PoseLabel, now: Instant) -> LockPhase {
        if let Some((locked, since)) = self.locked {
            let elapsed = now.saturating_duration_since(since).as_secs();
            return match self.hold_seconds.checked_sub(elapsed) {
                Some(remaining) if remaining > 0 => LockPhase::Holding {
                    remaining_secs: remaining,
                },
                _ => {
                    info!("Held {} for {}s", locked, self.hold_seconds);
                    *self.holds_completed.entry(locked).or_insert(0) += 1;
                    self.locked = None;
                    self.candidate = PoseLabel::Unknown;
                    self.counter = 0;
                    LockPhase::Completed
                }
            };
        }

        if label == self.candidate {
            self.counter = self.counter.saturating_add(1);
        } else {
            self.counter = 0;
            self.candidate = label;
        }

        if self.counter >= self.stability_frames && label.is_known() {
            info!("Pose locked: {}", label);
            self.locked = Some((label, now));
            return LockPhase::Locked;
        }
        LockPhase::Observing
    }

    pub fn locked_label(&self) -> Option<PoseLabel> {
        self.locked.map(|(label, _)| label)
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    pub fn candidate(&self) -> PoseLabel {
        self.candidate
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Completed holds per pose
    pub fn holds_completed(&self) -> &BTreeMap<PoseLabel, u32> {
        &self.holds_completed
    }

    pub fn total_holds(&self) -> u32 {
        self.holds_completed.values().sum()
    }

    /// Forget completed holds. An active lock keeps running.
    pub fn reset_session(&mut self) {
        self.holds_completed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const STEP: Duration = Duration::from_millis(33);

    fn lock() -> PoseLock {
        PoseLock::new(&YogaConfig::default())
    }

    #[test]
    fn test_locks_on_sixth_sighting() {
        let mut lock = lock();
        let t0 = Instant::now();

        for i in 0..5 {
            let phase = lock.observe(PoseLabel::TPose, t0 + STEP * i);
            assert_eq!(phase, LockPhase::Observing);
        }
        assert_eq!(lock.counter(), 4);
        assert_eq!(lock.observe(PoseLabel::TPose, t0 + STEP * 5), LockPhase::Locked);
        assert_eq!(lock.locked_label(), Some(PoseLabel::TPose));
    }

    #[test]
    fn test_unknown_never_locks() {
        let mut lock = lock();
        let t0 = Instant::now();
        for i in 0..50 {
            assert_eq!(lock.observe(PoseLabel::Unknown, t0 + STEP * i), LockPhase::Observing);
        }
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_counter_saturates_on_endless_unknown() {
        let mut lock = lock();
        let t0 = Instant::now();
        lock.counter = u32::MAX - 1;
        for i in 0..3 {
            assert_eq!(lock.observe(PoseLabel::Unknown, t0 + STEP * i), LockPhase::Observing);
        }
        assert_eq!(lock.counter(), u32::MAX);
    }

    #[test]
    fn test_change_resets_counter() {
        let mut lock = lock();
        let t0 = Instant::now();
        for i in 0..4 {
            lock.observe(PoseLabel::Utkatasana, t0 + STEP * i);
        }
        lock.observe(PoseLabel::TPose, t0 + STEP * 4);
        assert_eq!(lock.counter(), 0);
        assert_eq!(lock.candidate(), PoseLabel::TPose);
    }

    #[test]
    fn test_hold_round_trip() {
        let mut lock = lock();
        let t0 = Instant::now();
        for i in 0..6 {
            lock.observe(PoseLabel::Vrikshasana, t0 + STEP * i);
        }
        let locked_at = t0 + STEP * 5;
        assert!(lock.is_locked());

        // Classification is ignored while holding
        assert_eq!(
            lock.observe(PoseLabel::Unknown, locked_at + Duration::from_millis(100)),
            LockPhase::Holding { remaining_secs: 5 }
        );
        assert_eq!(
            lock.observe(PoseLabel::TPose, locked_at + Duration::from_millis(4_900)),
            LockPhase::Holding { remaining_secs: 1 }
        );
        assert_eq!(
            lock.observe(PoseLabel::TPose, locked_at + Duration::from_secs(5)),
            LockPhase::Completed
        );

        assert!(!lock.is_locked());
        assert_eq!(lock.candidate(), PoseLabel::Unknown);
        assert_eq!(lock.counter(), 0);
        assert_eq!(lock.holds_completed().get(&PoseLabel::Vrikshasana), Some(&1));
        assert_eq!(lock.total_holds(), 1);
    }

    #[test]
    fn test_reset_clears_completed_holds() {
        let mut lock = lock();
        let t0 = Instant::now();
        for i in 0..6 {
            lock.observe(PoseLabel::TPose, t0 + STEP * i);
        }
        lock.observe(PoseLabel::TPose, t0 + Duration::from_secs(6));
        assert_eq!(lock.total_holds(), 1);

        lock.reset_session();
        assert_eq!(lock.total_holds(), 0);
    }
}
