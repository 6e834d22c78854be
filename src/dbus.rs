//! D-Bus service exposing the notification UI interface.
//!
//! Owns `com.meismeric.auranotify.UI` on the session bus and exports the two
//! request methods. Method handlers only translate arguments into events on
//! the orchestrator channel; they never touch orchestrator state, so calls
//! are processed strictly in the order the main loop receives them.
//!
//! Calls to methods outside this interface are answered by the object
//! server with the standard `org.freedesktop.DBus.Error.UnknownMethod`
//! rejection without involving the orchestrator.

use anyhow::{Context, Result};
use std::sync::mpsc::Sender;
use zbus::blocking::Connection;

use crate::constants::{DBUS_BUS_NAME, DBUS_OBJECT_PATH};
use crate::events::Event;

struct UiService {
    events: Sender<Event>,
}

#[zbus::interface(name = "com.meismeric.auranotify.UI")]
impl UiService {
    /// Queue a transient notification for display. Empty strings are
    /// permitted and displayed as-is.
    fn show_notification(&self, icon: String, summary: String, body: String) {
        let _ = self.events.send(Event::ShowNotification {
            icon,
            summary,
            body,
        });
    }

    /// Set or clear a persistent status line. `text` is ignored when
    /// `active` is false.
    fn set_persistent_status(
        &self,
        id: String,
        active: bool,
        text: String,
    ) -> zbus::fdo::Result<()> {
        if id.is_empty() {
            return Err(zbus::fdo::Error::InvalidArgs(
                "persistent status id must not be empty".to_string(),
            ));
        }
        let _ = self.events.send(Event::SetPersistentStatus { id, active, text });
        Ok(())
    }
}

/// Connect to the session bus, claim the UI bus name, and start serving.
///
/// The returned connection must be kept alive for the lifetime of the
/// daemon; dropping it releases the bus name.
pub fn start_service(events: Sender<Event>, debug_enabled: bool) -> Result<Connection> {
    let connection = zbus::blocking::connection::Builder::session()
        .context("failed to connect to the session bus")?
        .name(DBUS_BUS_NAME)
        .context("failed to request the UI bus name")?
        .serve_at(DBUS_OBJECT_PATH, UiService { events })
        .context("failed to export the UI object")?
        .build()
        .context("failed to start the D-Bus service")?;

    if debug_enabled {
        log_pipe!();
        log_debug!("Serving {DBUS_BUS_NAME} at {DBUS_OBJECT_PATH}");
    }

    Ok(connection)
}
