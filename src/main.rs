//! Main application entry point and high-level flow coordination.
//!
//! Wires the daemon together after command-line parsing: single-instance
//! lock, configuration, signal handling, the D-Bus request service, the
//! renderer IPC thread, and finally the orchestrator event loop that owns
//! all state.
//!
//! The flow consists of:
//! 1. Argument parsing and early exit for help/version
//! 2. Lock file acquisition (refuse to start twice)
//! 3. Configuration loading
//! 4. Signal handler, D-Bus service, and renderer IPC startup
//! 5. Orchestrator event loop until a termination signal arrives
//! 6. Graceful cleanup on shutdown

use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use auroranotify_ui::args::{CliAction, ParsedArgs, display_help, display_version_info};
use auroranotify_ui::clock::SystemClock;
use auroranotify_ui::config::Config;
use auroranotify_ui::constants::EXIT_FAILURE;
use auroranotify_ui::events::Event;
use auroranotify_ui::ipc::{RendererSocketServer, socket_path};
use auroranotify_ui::logger::Log;
use auroranotify_ui::orchestrator::Orchestrator;
use auroranotify_ui::signals::setup_signal_handler;
use auroranotify_ui::{dbus, lock};
use auroranotify_ui::{
    log_block_start, log_debug, log_end, log_error_exit, log_pipe, log_version, log_warning,
};

/// Upper bound for the event-loop wait when no timer is armed. The channel
/// still wakes us immediately for any request or signal.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

fn main() {
    let parsed_args = ParsedArgs::from_env();

    match parsed_args.action {
        CliAction::Run { debug_enabled } => {
            if let Err(e) = run(debug_enabled) {
                log_pipe!();
                log_error_exit!("{e:#}");
                std::process::exit(EXIT_FAILURE);
            }
        }
        CliAction::ShowHelp => display_help(),
        CliAction::ShowVersion => display_version_info(),
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// Run the daemon until a termination signal arrives.
fn run(debug_enabled: bool) -> Result<()> {
    log_version!();
    if debug_enabled {
        Log::set_timestamps(true);
        log_pipe!();
        log_debug!("Debug mode enabled - showing detailed orchestrator operations");
    }

    let (lock_file, lock_path) = lock::acquire_lock()?;

    let config = Config::load()?;
    config.log_config();

    // One channel carries every external stimulus: D-Bus requests, renderer
    // interactions, and signals, in arrival order
    let (event_tx, event_rx) = mpsc::channel::<Event>();
    let (effect_tx, effect_rx) = mpsc::channel();

    let signal_state = setup_signal_handler(event_tx.clone(), debug_enabled)?;

    // Keep the connection alive for the lifetime of the daemon; dropping it
    // releases the bus name
    let _dbus_connection = dbus::start_service(event_tx.clone(), debug_enabled)?;

    let ipc_server = RendererSocketServer::new(socket_path())?;
    let ipc_running = signal_state.running.clone();
    let ipc_events = event_tx.clone();
    let ipc_thread = std::thread::spawn(move || {
        if let Err(e) = ipc_server.run(effect_rx, ipc_events, ipc_running, debug_enabled) {
            log_warning!("Renderer IPC server stopped: {e:#}");
        }
    });

    let mut orchestrator = Orchestrator::new(
        Arc::new(SystemClock),
        effect_tx,
        config.timing(),
        debug_enabled,
    );

    log_block_start!("Ready, waiting for notifications");

    run_event_loop(&mut orchestrator, &event_rx, &signal_state.running);

    log_block_start!("Shutting down...");
    // Dropping the orchestrator closes the effect channel, letting the IPC
    // thread drain and exit
    drop(orchestrator);
    signal_state.running.store(false, Ordering::SeqCst);
    let _ = ipc_thread.join();
    lock::release_lock(lock_file, &lock_path);
    log_end!();

    Ok(())
}

/// Drive the orchestrator: fire due timers, then sleep until the next timer
/// deadline or the next external event, whichever comes first.
fn run_event_loop(
    orchestrator: &mut Orchestrator,
    events: &Receiver<Event>,
    running: &std::sync::atomic::AtomicBool,
) {
    while running.load(Ordering::SeqCst) {
        orchestrator.fire_due_timers();

        let wait = orchestrator.time_until_next_timer().unwrap_or(IDLE_WAIT);
        match events.recv_timeout(wait) {
            Ok(Event::Shutdown) => break,
            Ok(Event::ReloadConfig) => match Config::load() {
                Ok(config) => {
                    config.log_config();
                    orchestrator.set_timing(config.timing());
                }
                Err(e) => {
                    log_pipe!();
                    log_warning!("Configuration reload failed, keeping previous values: {e:#}");
                }
            },
            Ok(event) => orchestrator.handle_event(event),
            Err(RecvTimeoutError::Timeout) => {}
            // Every sender hung up; nothing can reach us anymore
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
