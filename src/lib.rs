//! # auroranotify-ui Library
//!
//! Internal library for the auroranotify-ui binary.
//!
//! This library exists to enable testing of the orchestrator internals and
//! provide clean separation between CLI dispatch (main.rs) and daemon logic.
//!
//! ## Architecture
//!
//! - **Orchestrator**: `orchestrator` module owns the notification display
//!   state machine, its timer scheduler, and the render-effect contract
//! - **Transports**: `dbus` receives show/status requests from the session
//!   bus; `ipc` broadcasts render effects to the renderer over a Unix socket
//!   and feeds user interactions back
//! - **Infrastructure**: signal handling, single-instance locking,
//!   configuration, logging, and the clock abstraction used for testing

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod clock;
pub mod config;
pub mod constants;
pub mod dbus;
pub mod events;
pub mod ipc;
pub mod lock;
pub mod orchestrator;
pub mod signals;
