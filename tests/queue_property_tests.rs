//! Property-based tests for notification queue ordering.
//!
//! Whatever the arrival pattern, notifications must be displayed exactly
//! once each and in the order they were sent.

use proptest::prelude::*;
use std::sync::Arc;
use std::sync::mpsc::channel;
use std::time::Duration;

use auroranotify_ui::clock::ManualClock;
use auroranotify_ui::config::Timing;
use auroranotify_ui::orchestrator::{DisplayState, Orchestrator, RenderEffect};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn notifications_always_display_in_send_order(
        gaps in prop::collection::vec(0u64..10_000, 1..6)
    ) {
        let clock = Arc::new(ManualClock::new());
        let (tx, rx) = channel();
        let mut orchestrator =
            Orchestrator::new(clock.clone(), tx, Timing::default(), false);

        // Send one notification per gap, spacing arrivals arbitrarily
        // relative to the display cycle
        let count = gaps.len();
        for (i, gap) in gaps.into_iter().enumerate() {
            orchestrator.show_notification(
                "icon".to_string(),
                format!("n{i}"),
                String::new(),
            );
            let mut remaining = gap;
            while remaining > 0 {
                let tick = remaining.min(10);
                clock.advance(Duration::from_millis(tick));
                orchestrator.fire_due_timers();
                remaining -= tick;
            }
        }

        // Drain every remaining cycle
        for _ in 0..count + 1 {
            let mut remaining = 6_000u64;
            while remaining > 0 {
                clock.advance(Duration::from_millis(10));
                orchestrator.fire_due_timers();
                remaining -= 10;
            }
        }

        let displayed: Vec<String> = rx
            .try_iter()
            .filter_map(|e| match e {
                RenderEffect::RenderPill { summary } => Some(summary),
                _ => None,
            })
            .collect();

        let expected: Vec<String> = (0..count).map(|i| format!("n{i}")).collect();
        prop_assert_eq!(displayed, expected);
        prop_assert_eq!(orchestrator.state(), DisplayState::Idle);
    }
}
