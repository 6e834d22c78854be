//! Display state and notification data types.

/// One incoming transient alert.
///
/// Owned exclusively by the orchestrator from enqueue to disposal: it sits
/// at the tail of the pending queue until dequeued as the "current"
/// notification, and is dropped when superseded or when the display cycle
/// ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientNotification {
    /// Opaque icon identifier, passed through to the renderer.
    pub icon: String,
    pub summary: String,
    pub body: String,
}

/// The orchestrator's current visual/behavioral mode.
///
/// A single tagged value rather than a set of independent booleans, so that
/// combinations like "expanded while idle" are unrepresentable. The separate
/// `transitioning` guard on the orchestrator covers re-entrancy only; it
/// carries no mode information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// No current notification. The surface shows a sticky status pill or
    /// nothing at all.
    Idle,
    /// A notification is displayed in the compact pill form (or its intro
    /// sequence is in flight and the head of the queue is about to be).
    ShowingPill,
    /// A notification is displayed in the enlarged form with summary+body.
    ShowingExpanded,
    /// Teardown in progress; the surface will go dark when it completes.
    OutroToIdle,
    /// Teardown in progress; a persistent status will be shown when it
    /// completes.
    OutroToPersistent,
}

impl DisplayState {
    /// True while a transient notification is (or is about to be) on screen.
    pub fn is_showing(self) -> bool {
        matches!(self, DisplayState::ShowingPill | DisplayState::ShowingExpanded)
    }

    /// True while a teardown sequence is in flight.
    pub fn is_outro(self) -> bool {
        matches!(self, DisplayState::OutroToIdle | DisplayState::OutroToPersistent)
    }

    /// True whenever the display cycle is active, i.e. not idle.
    pub fn is_busy(self) -> bool {
        !matches!(self, DisplayState::Idle)
    }
}
