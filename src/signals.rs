//! Signal handling for the daemon.
//!
//! Termination signals (SIGTERM, SIGINT, SIGHUP) request shutdown; SIGUSR2
//! requests a configuration reload. A dedicated signal-hook iterator thread
//! translates signals into events on the orchestrator channel so the main
//! loop observes them in order with everything else.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc::Sender};
use std::thread;

use crate::events::Event;

/// Signal handling state shared with the main loop.
pub struct SignalState {
    /// Cleared when a termination signal arrives.
    pub running: Arc<AtomicBool>,
}

/// Install the signal handler thread.
pub fn setup_signal_handler(events: Sender<Event>, debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));

    let mut signals = Signals::new([SIGTERM, SIGINT, SIGHUP, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running_flag = running.clone();
    thread::spawn(move || {
        for signal in signals.forever() {
            match signal {
                SIGUSR2 => {
                    if debug_enabled {
                        log_pipe!();
                        log_debug!("Received SIGUSR2, requesting configuration reload");
                    }
                    if events.send(Event::ReloadConfig).is_err() {
                        break;
                    }
                }
                _ => {
                    running_flag.store(false, Ordering::SeqCst);
                    let _ = events.send(Event::Shutdown);
                    break;
                }
            }
        }
    });

    Ok(SignalState { running })
}
