//! One-shot timer scheduler for the orchestrator.
//!
//! Timers are keyed by purpose: at most one timer per purpose is armed at a
//! time, and arming a new one implicitly cancels any outstanding timer of
//! that purpose. Cancellation removes the deadline from the schedule
//! outright, so a cancelled timer cannot fire at all — there is no "fired
//! but ignored" window to reason about.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::clock::Clock;

/// Identifies what a pending timer will do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPurpose {
    /// Apply the "dot" class shortly after the surface becomes visible.
    IntroDot,
    /// Grow the dot into the pill.
    IntroPill,
    /// Intro animation has settled; dequeue and render the head of queue.
    IntroFinish,
    /// Release the re-entrancy guard once an animation has settled.
    Settle,
    /// Auto-dismiss or advance to the next queued notification.
    Dismiss,
    /// Populate expanded content after the expand animation has started.
    ExpandedContent,
    /// Strip the "dot" class partway through the outro.
    OutroDot,
    /// Outro animation has settled; re-check the queue or go idle.
    OutroFinish,
}

/// Owns all pending one-shot deadlines for one orchestrator instance.
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    armed: Vec<(TimerPurpose, Instant)>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            armed: Vec::new(),
        }
    }

    /// Arm a timer, replacing any outstanding timer of the same purpose.
    pub fn arm(&mut self, purpose: TimerPurpose, delay: Duration) {
        self.cancel(purpose);
        self.armed.push((purpose, self.clock.now() + delay));
    }

    /// Cancel the timer of the given purpose, if armed.
    pub fn cancel(&mut self, purpose: TimerPurpose) {
        self.armed.retain(|(p, _)| *p != purpose);
    }

    pub fn is_armed(&self, purpose: TimerPurpose) -> bool {
        self.armed.iter().any(|(p, _)| *p == purpose)
    }

    /// Time remaining until the earliest pending deadline, `None` when no
    /// timers are armed. Returns zero for deadlines already in the past.
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.armed
            .iter()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
            .min()
    }

    /// Remove and return the earliest timer whose deadline has passed.
    ///
    /// Due timers are delivered in deadline order, one per call, so a fired
    /// timer can arm or cancel others before the next due one is taken.
    pub fn pop_due(&mut self) -> Option<TimerPurpose> {
        let now = self.clock.now();
        let idx = self
            .armed
            .iter()
            .enumerate()
            .filter(|(_, (_, deadline))| *deadline <= now)
            .min_by_key(|(_, (_, deadline))| *deadline)
            .map(|(idx, _)| idx)?;
        Some(self.armed.swap_remove(idx).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn scheduler() -> (Arc<ManualClock>, Scheduler) {
        let clock = Arc::new(ManualClock::new());
        let scheduler = Scheduler::new(clock.clone());
        (clock, scheduler)
    }

    #[test]
    fn nothing_fires_before_its_deadline() {
        let (clock, mut scheduler) = scheduler();
        scheduler.arm(TimerPurpose::Dismiss, Duration::from_millis(100));

        assert_eq!(scheduler.pop_due(), None);
        clock.advance(Duration::from_millis(99));
        assert_eq!(scheduler.pop_due(), None);
        clock.advance(Duration::from_millis(1));
        assert_eq!(scheduler.pop_due(), Some(TimerPurpose::Dismiss));
        assert_eq!(scheduler.pop_due(), None);
    }

    #[test]
    fn arming_replaces_same_purpose() {
        let (clock, mut scheduler) = scheduler();
        scheduler.arm(TimerPurpose::Dismiss, Duration::from_millis(100));
        scheduler.arm(TimerPurpose::Dismiss, Duration::from_millis(500));

        // The original 100ms deadline must be gone
        clock.advance(Duration::from_millis(200));
        assert_eq!(scheduler.pop_due(), None);

        clock.advance(Duration::from_millis(300));
        assert_eq!(scheduler.pop_due(), Some(TimerPurpose::Dismiss));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let (clock, mut scheduler) = scheduler();
        scheduler.arm(TimerPurpose::Settle, Duration::from_millis(50));
        scheduler.cancel(TimerPurpose::Settle);
        assert!(!scheduler.is_armed(TimerPurpose::Settle));

        clock.advance(Duration::from_secs(10));
        assert_eq!(scheduler.pop_due(), None);
    }

    #[test]
    fn due_timers_pop_in_deadline_order() {
        let (clock, mut scheduler) = scheduler();
        scheduler.arm(TimerPurpose::OutroFinish, Duration::from_millis(500));
        scheduler.arm(TimerPurpose::OutroDot, Duration::from_millis(250));

        clock.advance(Duration::from_millis(600));
        assert_eq!(scheduler.pop_due(), Some(TimerPurpose::OutroDot));
        assert_eq!(scheduler.pop_due(), Some(TimerPurpose::OutroFinish));
    }

    #[test]
    fn time_until_next_reports_earliest_deadline() {
        let (clock, mut scheduler) = scheduler();
        assert_eq!(scheduler.time_until_next(), None);

        scheduler.arm(TimerPurpose::Dismiss, Duration::from_millis(4000));
        scheduler.arm(TimerPurpose::Settle, Duration::from_millis(500));
        assert_eq!(scheduler.time_until_next(), Some(Duration::from_millis(500)));

        clock.advance(Duration::from_millis(700));
        // Past deadlines report zero, not an underflow
        assert_eq!(scheduler.time_until_next(), Some(Duration::ZERO));
    }
}
