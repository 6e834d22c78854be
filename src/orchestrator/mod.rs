//! Notification display orchestrator.
//!
//! A single-threaded state machine that accepts transient-notification and
//! persistent-status requests, keeps a FIFO queue of pending notifications,
//! and drives the dot → pill → [expanded] → outro → idle display lifecycle
//! through cancellable one-shot timers.
//!
//! All mutation happens on the thread that owns the [`Orchestrator`]; timer
//! fires and external requests are indistinguishable entry points into the
//! same state machine. The `transitioning` flag is a re-entrancy guard
//! against overlapping logical transitions from different callback sources,
//! not a lock: a dismiss timer or interaction arriving while a transition is
//! settling is dropped, never rescheduled.

pub mod effects;
pub mod scheduler;
pub mod state;

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::clock::Clock;
use crate::config::Timing;
use crate::constants::{CLASS_DOT, CLASS_EXPANDED, CLASS_PILL};
use crate::events::{Event, InteractionEvent};

pub use effects::RenderEffect;
pub use scheduler::{Scheduler, TimerPurpose};
pub use state::{DisplayState, TransientNotification};

pub struct Orchestrator {
    state: DisplayState,
    /// Re-entrancy guard, held while an animation is settling.
    transitioning: bool,
    queue: VecDeque<TransientNotification>,
    current: Option<TransientNotification>,
    /// Persistent statuses keyed by id. Iteration order is arbitrary; when
    /// several are active the first one found is displayed.
    statuses: HashMap<String, String>,
    scheduler: Scheduler,
    effects: Sender<RenderEffect>,
    timing: Timing,
    debug_enabled: bool,
}

impl Orchestrator {
    pub fn new(
        clock: Arc<dyn Clock>,
        effects: Sender<RenderEffect>,
        timing: Timing,
        debug_enabled: bool,
    ) -> Self {
        Self {
            state: DisplayState::Idle,
            transitioning: false,
            queue: VecDeque::new(),
            current: None,
            statuses: HashMap::new(),
            scheduler: Scheduler::new(clock),
            effects,
            timing,
            debug_enabled,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Swap in new timing values after a configuration reload. Timers that
    /// are already armed keep their original deadlines.
    pub fn set_timing(&mut self, timing: Timing) {
        self.timing = timing;
    }

    /// Time remaining until the next armed timer fires, for the event loop's
    /// wait bound.
    pub fn time_until_next_timer(&self) -> Option<std::time::Duration> {
        self.scheduler.time_until_next()
    }

    /// Fire every timer whose deadline has passed, in deadline order.
    pub fn fire_due_timers(&mut self) {
        while let Some(purpose) = self.scheduler.pop_due() {
            self.on_timer(purpose);
        }
    }

    /// Dispatch one external event into the state machine.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::ShowNotification {
                icon,
                summary,
                body,
            } => self.show_notification(icon, summary, body),
            Event::SetPersistentStatus { id, active, text } => {
                self.set_persistent_status(id, active, text)
            }
            Event::Interaction(InteractionEvent::Activate) => self.activate(),
            Event::Interaction(InteractionEvent::Dismiss) => self.dismiss_request(),
            Event::Interaction(InteractionEvent::PointerEnter) => self.pointer_enter(),
            Event::Interaction(InteractionEvent::PointerLeave) => self.pointer_leave(),
            // Shutdown and reload are handled by the event loop, not here
            Event::ReloadConfig | Event::Shutdown => {}
        }
    }

    /// Enqueue a transient notification and, when idle, kick off the display
    /// cycle. While a cycle is running the notification just waits its turn.
    pub fn show_notification(&mut self, icon: String, summary: String, body: String) {
        if self.debug_enabled {
            log_decorated!("Received and queued: {summary}");
        }
        self.queue.push_back(TransientNotification {
            icon,
            summary,
            body,
        });

        if !self.state.is_busy() {
            if self.debug_enabled {
                log_decorated!("Surface is idle, starting display cycle");
            }
            self.begin_intro();
        }
    }

    /// Insert, replace, or remove a persistent status. Only re-renders the
    /// surface when idle; mid-cycle the visible effect is deferred until the
    /// cycle returns to idle.
    pub fn set_persistent_status(&mut self, id: String, active: bool, text: String) {
        if id.is_empty() {
            // Rejected at the D-Bus boundary; ignored here as a backstop
            return;
        }
        if active {
            self.statuses.insert(id, text);
        } else {
            self.statuses.remove(&id);
        }

        if self.state == DisplayState::Idle {
            self.render_idle_surface();
        } else if self.state.is_outro() {
            // The outro already committed to a destination; keep the
            // advertised one in sync with the status set
            self.state = if self.statuses.is_empty() {
                DisplayState::OutroToIdle
            } else {
                DisplayState::OutroToPersistent
            };
        }
    }

    fn on_timer(&mut self, purpose: TimerPurpose) {
        match purpose {
            TimerPurpose::IntroDot => {
                self.emit(RenderEffect::visual_class(CLASS_DOT, true));
                self.scheduler
                    .arm(TimerPurpose::IntroPill, self.timing.intro_pill_delay);
            }
            TimerPurpose::IntroPill => {
                self.emit(RenderEffect::visual_class(CLASS_PILL, true));
            }
            TimerPurpose::IntroFinish => self.show_next_notification(),
            TimerPurpose::Settle => self.transitioning = false,
            TimerPurpose::Dismiss => self.dismiss_or_advance(),
            TimerPurpose::ExpandedContent => {
                if let Some(current) = &self.current {
                    self.effects
                        .send(RenderEffect::RenderExpanded {
                            summary: current.summary.clone(),
                            body: current.body.clone(),
                        })
                        .ok();
                }
            }
            TimerPurpose::OutroDot => {
                self.emit(RenderEffect::visual_class(CLASS_DOT, false));
            }
            TimerPurpose::OutroFinish => self.finish_outro(),
        }
    }

    /// Start the dot → pill intro sequence. The head of the queue is
    /// dequeued once the intro animation has settled.
    fn begin_intro(&mut self) {
        self.state = DisplayState::ShowingPill;
        self.emit(RenderEffect::surface_visible(true));
        self.scheduler
            .arm(TimerPurpose::IntroDot, self.timing.intro_dot_delay);
        self.scheduler
            .arm(TimerPurpose::IntroFinish, self.timing.settle_delay);
    }

    /// Dequeue the head of the queue into "current" and render it, keeping
    /// the expanded form if the user had expanded the previous notification.
    fn show_next_notification(&mut self) {
        self.transitioning = true;

        self.current = self.queue.pop_front();
        let Some(current) = &self.current else {
            // Queue drained before we got here; fall through to the outro
            self.transitioning = false;
            self.dismiss_or_advance();
            return;
        };

        if self.debug_enabled {
            log_decorated!("Showing notification: {}", current.summary);
        }

        let pill = RenderEffect::RenderPill {
            summary: current.summary.clone(),
        };
        let expanded = (self.state == DisplayState::ShowingExpanded).then(|| {
            RenderEffect::RenderExpanded {
                summary: current.summary.clone(),
                body: current.body.clone(),
            }
        });
        self.emit(pill);
        if let Some(expanded) = expanded {
            self.emit(expanded);
        }

        self.scheduler
            .arm(TimerPurpose::Settle, self.timing.settle_delay);
        let dismiss_after = if self.state == DisplayState::ShowingExpanded {
            self.timing.expanded_duration
        } else {
            self.timing.pill_duration
        };
        self.scheduler.arm(TimerPurpose::Dismiss, dismiss_after);
    }

    /// Dismiss the current notification: advance straight to the next queued
    /// one when the queue has items, otherwise start the outro. Re-entrant
    /// calls while a transition is settling are dropped.
    fn dismiss_or_advance(&mut self) {
        if self.transitioning {
            return;
        }
        self.transitioning = true;
        self.scheduler.cancel(TimerPurpose::Dismiss);

        if !self.queue.is_empty() {
            if self.debug_enabled {
                log_decorated!("Queue has items, transitioning content");
            }
            self.show_next_notification();
            return;
        }

        if self.debug_enabled {
            log_decorated!("Queue is empty, starting outro");
        }
        self.current = None;
        if self.state == DisplayState::ShowingExpanded {
            self.emit(RenderEffect::visual_class(CLASS_EXPANDED, false));
        }
        self.emit(RenderEffect::visual_class(CLASS_PILL, false));

        self.state = if self.statuses.is_empty() {
            DisplayState::OutroToIdle
        } else {
            DisplayState::OutroToPersistent
        };
        self.scheduler
            .arm(TimerPurpose::OutroDot, self.timing.outro_dot_delay);
        self.scheduler
            .arm(TimerPurpose::OutroFinish, self.timing.settle_delay);
    }

    /// Outro settled: restart the cycle if requests arrived in the meantime,
    /// otherwise enter idle. Restarting skips the idle render entirely so a
    /// waiting backlog never flickers the surface dark.
    fn finish_outro(&mut self) {
        self.transitioning = false;

        if !self.queue.is_empty() {
            if self.debug_enabled {
                log_decorated!("Outro complete but new items are queued, restarting cycle");
            }
            self.begin_intro();
            return;
        }

        if self.debug_enabled {
            log_decorated!("Outro complete, surface is now idle");
        }
        self.enter_idle();
    }

    fn enter_idle(&mut self) {
        self.state = DisplayState::Idle;
        self.transitioning = false;
        self.render_idle_surface();
    }

    /// Render the idle surface from the persistent status set: the first
    /// status found becomes the sticky pill, or the surface is hidden when
    /// none are active.
    fn render_idle_surface(&mut self) {
        match self.statuses.values().next().cloned() {
            Some(text) => {
                self.emit(RenderEffect::RenderIdleWithStatus { text });
                self.emit(RenderEffect::surface_visible(true));
            }
            None => {
                self.emit(RenderEffect::RenderIdleEmpty);
                self.emit(RenderEffect::surface_visible(false));
            }
        }
    }

    /// Primary activation: expand a collapsed pill, or dismiss an already
    /// expanded one. Dropped while a transition is settling or when there is
    /// no current notification to act on.
    fn activate(&mut self) {
        if self.transitioning {
            return;
        }
        match self.state {
            DisplayState::ShowingPill => {
                if self.current.is_none() {
                    return;
                }
                if self.debug_enabled {
                    log_decorated!("Clicked to expand");
                }
                self.transitioning = true;
                self.scheduler.cancel(TimerPurpose::Dismiss);

                self.state = DisplayState::ShowingExpanded;
                self.emit(RenderEffect::visual_class(CLASS_EXPANDED, true));
                self.scheduler.arm(
                    TimerPurpose::ExpandedContent,
                    self.timing.expanded_content_delay,
                );
                self.scheduler
                    .arm(TimerPurpose::Settle, self.timing.settle_delay);
                self.scheduler
                    .arm(TimerPurpose::Dismiss, self.timing.expanded_duration);
            }
            DisplayState::ShowingExpanded => self.dismiss_or_advance(),
            // Nothing on screen to interact with
            _ => {}
        }
    }

    /// Secondary activation: dismiss whatever is showing. A no-op while
    /// idle (nothing to dismiss), during an outro (already tearing down),
    /// and during the intro window (nothing dequeued yet; advancing here
    /// would race the still-armed intro timers).
    fn dismiss_request(&mut self) {
        if !self.state.is_showing() || self.current.is_none() {
            return;
        }
        self.dismiss_or_advance();
    }

    /// Pointer entered the surface while expanded: cancel the dismiss timer
    /// outright, pausing auto-dismissal until the pointer leaves.
    fn pointer_enter(&mut self) {
        if self.state == DisplayState::ShowingExpanded
            && self.scheduler.is_armed(TimerPurpose::Dismiss)
        {
            if self.debug_enabled {
                log_decorated!("Pointer entered, pausing dismissal timer");
            }
            self.scheduler.cancel(TimerPurpose::Dismiss);
        }
    }

    /// Pointer left the surface while expanded and paused: re-arm exactly
    /// one dismiss timer with the long duration.
    fn pointer_leave(&mut self) {
        if self.state == DisplayState::ShowingExpanded
            && !self.scheduler.is_armed(TimerPurpose::Dismiss)
        {
            if self.debug_enabled {
                log_decorated!("Pointer left, restarting dismissal timer");
            }
            self.scheduler
                .arm(TimerPurpose::Dismiss, self.timing.expanded_duration);
        }
    }

    fn emit(&self, effect: RenderEffect) {
        // The receiver disappears during shutdown; effects emitted after
        // that point are inconsequential
        self.effects.send(effect).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::mpsc::{Receiver, channel};
    use std::time::Duration;

    fn orchestrator() -> (Arc<ManualClock>, Orchestrator, Receiver<RenderEffect>) {
        let clock = Arc::new(ManualClock::new());
        let (tx, rx) = channel();
        let orchestrator = Orchestrator::new(clock.clone(), tx, Timing::default(), false);
        (clock, orchestrator, rx)
    }

    fn step(clock: &ManualClock, orchestrator: &mut Orchestrator, ms: u64) {
        let mut remaining = ms;
        while remaining > 0 {
            let tick = remaining.min(10);
            clock.advance(Duration::from_millis(tick));
            orchestrator.fire_due_timers();
            remaining -= tick;
        }
    }

    fn drain(rx: &Receiver<RenderEffect>) -> Vec<RenderEffect> {
        rx.try_iter().collect()
    }

    #[test]
    fn empty_id_status_is_ignored() {
        let (_clock, mut orchestrator, rx) = orchestrator();
        orchestrator.set_persistent_status(String::new(), true, "ghost".to_string());
        assert!(drain(&rx).is_empty());
        assert_eq!(orchestrator.state(), DisplayState::Idle);
    }

    #[test]
    fn intro_sequence_applies_dot_then_pill() {
        let (clock, mut orchestrator, rx) = orchestrator();
        orchestrator.show_notification("icon".into(), "Hi".into(), "there".into());
        assert_eq!(drain(&rx), vec![RenderEffect::surface_visible(true)]);

        step(&clock, &mut orchestrator, 50);
        assert_eq!(drain(&rx), vec![RenderEffect::visual_class(CLASS_DOT, true)]);

        step(&clock, &mut orchestrator, 100);
        assert_eq!(drain(&rx), vec![RenderEffect::visual_class(CLASS_PILL, true)]);

        step(&clock, &mut orchestrator, 350);
        assert_eq!(
            drain(&rx),
            vec![RenderEffect::RenderPill {
                summary: "Hi".into()
            }]
        );
        assert_eq!(orchestrator.state(), DisplayState::ShowingPill);
    }

    #[test]
    fn activate_during_intro_window_is_a_noop() {
        let (clock, mut orchestrator, rx) = orchestrator();
        orchestrator.show_notification("i".into(), "s".into(), "b".into());
        step(&clock, &mut orchestrator, 200);
        drain(&rx);

        // Intro has not settled yet, so no notification is current
        orchestrator.handle_event(Event::Interaction(InteractionEvent::Activate));
        assert!(drain(&rx).is_empty());
        assert_eq!(orchestrator.state(), DisplayState::ShowingPill);
    }

    #[test]
    fn at_most_one_current_notification() {
        let (clock, mut orchestrator, rx) = orchestrator();
        orchestrator.show_notification("i".into(), "first".into(), "b".into());
        step(&clock, &mut orchestrator, 500);
        drain(&rx);

        // Enqueuing more never disturbs the one being shown
        orchestrator.show_notification("i".into(), "second".into(), "b".into());
        orchestrator.show_notification("i".into(), "third".into(), "b".into());
        assert!(drain(&rx).is_empty());
        assert_eq!(orchestrator.state(), DisplayState::ShowingPill);
    }

    #[test]
    fn outro_destination_tracks_status_set() {
        let (clock, mut orchestrator, rx) = orchestrator();
        orchestrator.set_persistent_status("mic".into(), true, "Mic in use".into());
        drain(&rx);

        orchestrator.show_notification("i".into(), "s".into(), "b".into());
        step(&clock, &mut orchestrator, 500);

        // Let the pill settle, then dismiss it
        step(&clock, &mut orchestrator, 500);
        orchestrator.handle_event(Event::Interaction(InteractionEvent::Dismiss));
        assert_eq!(orchestrator.state(), DisplayState::OutroToPersistent);

        step(&clock, &mut orchestrator, 500);
        assert_eq!(orchestrator.state(), DisplayState::Idle);
        let effects = drain(&rx);
        assert!(effects.contains(&RenderEffect::RenderIdleWithStatus {
            text: "Mic in use".into()
        }));
    }

    #[test]
    fn status_arriving_mid_outro_updates_destination() {
        let (clock, mut orchestrator, rx) = orchestrator();
        orchestrator.show_notification("i".into(), "s".into(), "b".into());
        step(&clock, &mut orchestrator, 1000);
        orchestrator.handle_event(Event::Interaction(InteractionEvent::Dismiss));
        assert_eq!(orchestrator.state(), DisplayState::OutroToIdle);
        drain(&rx);

        // The outro is committed but its destination follows the status set
        orchestrator.set_persistent_status("mic".into(), true, "Mic in use".into());
        assert_eq!(orchestrator.state(), DisplayState::OutroToPersistent);

        step(&clock, &mut orchestrator, 500);
        assert_eq!(orchestrator.state(), DisplayState::Idle);
        assert!(drain(&rx).contains(&RenderEffect::RenderIdleWithStatus {
            text: "Mic in use".into()
        }));
    }

    #[test]
    fn reload_keeps_armed_deadlines() {
        let (clock, mut orchestrator, rx) = orchestrator();
        orchestrator.show_notification("i".into(), "s".into(), "b".into());
        step(&clock, &mut orchestrator, 500);
        drain(&rx);

        // Shorten the pill duration mid-cycle; the armed dismiss timer
        // keeps its original 4s deadline
        orchestrator.set_timing(Timing {
            pill_duration: Duration::from_millis(100),
            ..Timing::default()
        });
        step(&clock, &mut orchestrator, 1000);
        assert_eq!(orchestrator.state(), DisplayState::ShowingPill);

        step(&clock, &mut orchestrator, 3000);
        assert!(orchestrator.state().is_outro());
    }
}
