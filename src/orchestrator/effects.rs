//! Render effects emitted by the orchestrator.
//!
//! The orchestrator never calls into a renderer directly; it emits these
//! state-change effects on a channel, and the IPC layer broadcasts them as
//! JSON lines to whichever renderer process is subscribed.

use serde::{Deserialize, Serialize};

/// One render instruction for the UI collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum RenderEffect {
    /// Show the compact pill with an ellipsized summary.
    RenderPill { summary: String },
    /// Show the enlarged view with full summary and body.
    RenderExpanded { summary: String, body: String },
    /// Show the sticky status pill while idle.
    RenderIdleWithStatus { text: String },
    /// Clear the surface content while idle.
    RenderIdleEmpty,
    /// Map or unmap the island surface.
    SetSurfaceVisible { visible: bool },
    /// Add or remove a styling class ("dot", "pill", "expanded").
    SetVisualClass { name: String, present: bool },
}

impl RenderEffect {
    pub fn visual_class(name: &str, present: bool) -> Self {
        RenderEffect::SetVisualClass {
            name: name.to_string(),
            present,
        }
    }

    pub fn surface_visible(visible: bool) -> Self {
        RenderEffect::SetSurfaceVisible { visible }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_serialization() {
        let effect = RenderEffect::RenderPill {
            summary: "Battery low".to_string(),
        };
        let json = serde_json::to_string(&effect).unwrap();
        assert_eq!(json, r#"{"effect":"render_pill","summary":"Battery low"}"#);

        let effect = RenderEffect::visual_class("dot", true);
        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains(r#""effect":"set_visual_class""#));
        assert!(json.contains(r#""name":"dot""#));
        assert!(json.contains(r#""present":true"#));
    }

    #[test]
    fn effect_round_trip() {
        let effect = RenderEffect::RenderExpanded {
            summary: "Update".to_string(),
            body: "Restart required".to_string(),
        };
        let json = serde_json::to_string(&effect).unwrap();
        let parsed: RenderEffect = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, effect);
    }
}
