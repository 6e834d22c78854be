//! Event types delivered to the orchestrator loop.
//!
//! Every mutation of orchestrator state enters through exactly one channel:
//! the D-Bus service, the renderer socket, and the signal handler all
//! translate their inputs into [`Event`] values and send them to the main
//! loop, which processes them in delivery order on a single thread.

use serde::{Deserialize, Serialize};

/// User interactions reported back by the renderer over the Unix socket.
///
/// These arrive as JSON lines, one object per line, with an `interaction`
/// tag field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "interaction", rename_all = "snake_case")]
pub enum InteractionEvent {
    /// Primary activation (click) on the island surface.
    Activate,
    /// Secondary activation (right-click), requesting dismissal.
    Dismiss,
    /// Pointer entered the island surface.
    PointerEnter,
    /// Pointer left the island surface.
    PointerLeave,
}

/// Unified event type for all orchestrator input sources.
#[derive(Debug, Clone)]
pub enum Event {
    /// A transient notification request from the session bus.
    ShowNotification {
        icon: String,
        summary: String,
        body: String,
    },
    /// A persistent status update from the session bus.
    SetPersistentStatus {
        id: String,
        active: bool,
        text: String,
    },
    /// A user interaction reported by the renderer.
    Interaction(InteractionEvent),
    /// Configuration reload request (SIGUSR2).
    ReloadConfig,
    /// Shutdown request (SIGTERM, SIGINT, SIGHUP).
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interaction_wire_format() {
        let json = serde_json::to_string(&InteractionEvent::PointerEnter).unwrap();
        assert_eq!(json, r#"{"interaction":"pointer_enter"}"#);

        let parsed: InteractionEvent = serde_json::from_str(r#"{"interaction":"activate"}"#).unwrap();
        assert_eq!(parsed, InteractionEvent::Activate);
    }

    #[test]
    fn unknown_interaction_is_rejected() {
        let result = serde_json::from_str::<InteractionEvent>(r#"{"interaction":"triple_click"}"#);
        assert!(result.is_err());
    }
}
