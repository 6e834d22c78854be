//! Unix socket server connecting the orchestrator to its renderer.
//!
//! The server broadcasts every [`RenderEffect`] as one JSON line to all
//! connected clients, replays the current surface to newly connected ones,
//! and parses [`InteractionEvent`] JSON lines sent back by clients into
//! orchestrator events. It runs on its own thread; the orchestrator is only
//! ever reached through the event channel.

use anyhow::{Context, Result};
use nix::unistd::getuid;
use std::collections::{BTreeMap, HashMap};
use std::io::{BufWriter, Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::constants::SOCKET_FILE_NAME;
use crate::events::{Event, InteractionEvent};
use crate::orchestrator::RenderEffect;

/// Maximum buffered length of one interaction line. Real interaction
/// messages are tens of bytes; a client exceeding this without sending a
/// newline is disconnected.
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// What a freshly connected renderer needs to reconstruct the surface.
///
/// Tracks the latest visibility, each visual class, and the last content
/// render; replayed in that order so a late-joining renderer converges on
/// the live surface without seeing the whole effect history.
#[derive(Default)]
struct SurfaceSnapshot {
    visible: Option<bool>,
    classes: BTreeMap<String, bool>,
    content: Option<RenderEffect>,
}

impl SurfaceSnapshot {
    fn apply(&mut self, effect: &RenderEffect) {
        match effect {
            RenderEffect::SetSurfaceVisible { visible } => self.visible = Some(*visible),
            RenderEffect::SetVisualClass { name, present } => {
                self.classes.insert(name.clone(), *present);
            }
            content => self.content = Some(content.clone()),
        }
    }

    fn replay(&self) -> Vec<RenderEffect> {
        let mut effects = Vec::new();
        if let Some(visible) = self.visible {
            effects.push(RenderEffect::surface_visible(visible));
        }
        for (name, present) in &self.classes {
            effects.push(RenderEffect::visual_class(name, *present));
        }
        if let Some(content) = &self.content {
            effects.push(content.clone());
        }
        effects
    }
}

/// Represents a connected renderer client.
struct ClientConnection {
    raw_stream: UnixStream,
    writer: BufWriter<UnixStream>,
    /// Partial line received so far; interactions are parsed per full line.
    read_buffer: String,
    connected_at: Instant,
}

/// Unix socket server for renderer connections.
pub struct RendererSocketServer {
    socket_path: PathBuf,
    listener: UnixListener,
    clients: HashMap<u32, ClientConnection>,
    next_client_id: u32,
    surface: SurfaceSnapshot,
}

impl RendererSocketServer {
    /// Create the server socket, replacing any leftover socket file.
    pub fn new(socket_path: PathBuf) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(&socket_path).with_context(|| {
                format!("failed to remove existing socket: {}", socket_path.display())
            })?;
        }
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create socket directory: {}", parent.display())
            })?;
        }

        let listener = UnixListener::bind(&socket_path)
            .with_context(|| format!("failed to bind Unix socket: {}", socket_path.display()))?;
        listener
            .set_nonblocking(true)
            .context("failed to set socket to non-blocking mode")?;

        Ok(Self {
            socket_path,
            listener,
            clients: HashMap::new(),
            next_client_id: 1,
            surface: SurfaceSnapshot::default(),
        })
    }

    /// Run the server loop until shutdown.
    ///
    /// # Arguments
    /// * `effects` - Render effects coming from the orchestrator
    /// * `events` - Channel into the orchestrator loop for interactions
    /// * `running` - Cleared when the daemon is shutting down
    pub fn run(
        mut self,
        effects: Receiver<RenderEffect>,
        events: Sender<Event>,
        running: Arc<AtomicBool>,
        debug_enabled: bool,
    ) -> Result<()> {
        if debug_enabled {
            log_debug!("Renderer IPC listening on {}", self.socket_path.display());
        }

        while running.load(Ordering::SeqCst) {
            // Broadcast pending render effects (non-blocking)
            while let Ok(effect) = effects.try_recv() {
                self.surface.apply(&effect);
                self.broadcast_effect(&effect, debug_enabled);
            }

            self.accept(debug_enabled)?;
            self.poll_clients(&events, debug_enabled);

            // Small delay to prevent busy-waiting
            thread::sleep(Duration::from_millis(10));
        }

        if debug_enabled {
            log_debug!("Renderer IPC shutting down");
        }
        self.cleanup()
    }

    /// Send one effect to all connected clients, pruning any that fail.
    fn broadcast_effect(&mut self, effect: &RenderEffect, debug_enabled: bool) {
        let Ok(json_line) = serde_json::to_string(effect) else {
            return;
        };
        let message = format!("{json_line}\n");

        let mut failed = Vec::new();
        for (client_id, client) in &mut self.clients {
            if client.writer.write_all(message.as_bytes()).is_err()
                || client.writer.flush().is_err()
            {
                failed.push(*client_id);
            }
        }
        for client_id in failed {
            self.drop_client(client_id, debug_enabled);
        }
    }

    /// Accept new renderer connections (non-blocking) and replay the
    /// current surface to each.
    fn accept(&mut self, debug_enabled: bool) -> Result<()> {
        loop {
            match self.listener.accept() {
                Ok((stream, _addr)) => {
                    let client_id = self.next_client_id;
                    self.next_client_id += 1;

                    stream
                        .set_nonblocking(true)
                        .context("failed to set client stream to non-blocking mode")?;
                    let writer_stream = stream
                        .try_clone()
                        .context("failed to clone stream for writer")?;

                    let mut client = ClientConnection {
                        raw_stream: stream,
                        writer: BufWriter::new(writer_stream),
                        read_buffer: String::new(),
                        connected_at: Instant::now(),
                    };

                    let mut replay_failed = false;
                    for effect in self.surface.replay() {
                        let Ok(json_line) = serde_json::to_string(&effect) else {
                            continue;
                        };
                        if client
                            .writer
                            .write_all(format!("{json_line}\n").as_bytes())
                            .is_err()
                        {
                            replay_failed = true;
                            break;
                        }
                    }
                    if replay_failed || client.writer.flush().is_err() {
                        continue;
                    }

                    self.clients.insert(client_id, client);
                    if debug_enabled {
                        log_debug!("Renderer connected - connections: {}", self.clients.len());
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    if debug_enabled {
                        log_debug!("Error accepting renderer connection: {e}");
                    }
                    break;
                }
            }
        }
        Ok(())
    }

    /// Read interaction lines from clients and detect disconnections.
    fn poll_clients(&mut self, events: &Sender<Event>, debug_enabled: bool) {
        let mut disconnected = Vec::new();

        for (client_id, client) in &mut self.clients {
            let mut buffer = [0u8; 1024];
            loop {
                match client.raw_stream.read(&mut buffer) {
                    Ok(0) => {
                        // Graceful disconnect
                        disconnected.push(*client_id);
                        break;
                    }
                    Ok(n) => {
                        client
                            .read_buffer
                            .push_str(&String::from_utf8_lossy(&buffer[..n]));
                        while let Some(newline) = client.read_buffer.find('\n') {
                            let line: String = client.read_buffer.drain(..=newline).collect();
                            let line = line.trim();
                            if line.is_empty() {
                                continue;
                            }
                            match serde_json::from_str::<InteractionEvent>(line) {
                                Ok(interaction) => {
                                    let _ = events.send(Event::Interaction(interaction));
                                }
                                Err(e) => {
                                    if debug_enabled {
                                        log_debug!("Ignoring malformed interaction line: {e}");
                                    }
                                }
                            }
                        }
                        if client.read_buffer.len() > MAX_LINE_LENGTH {
                            if debug_enabled {
                                log_debug!(
                                    "Disconnecting renderer after oversized interaction line"
                                );
                            }
                            disconnected.push(*client_id);
                            break;
                        }
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                    Err(ref e)
                        if e.kind() == std::io::ErrorKind::ConnectionReset
                            || e.kind() == std::io::ErrorKind::BrokenPipe =>
                    {
                        disconnected.push(*client_id);
                        break;
                    }
                    Err(_) => {
                        disconnected.push(*client_id);
                        break;
                    }
                }
            }
        }

        for client_id in disconnected {
            self.drop_client(client_id, debug_enabled);
        }
    }

    fn drop_client(&mut self, client_id: u32, debug_enabled: bool) {
        if let Some(client) = self.clients.remove(&client_id)
            && debug_enabled
        {
            log_debug!(
                "Renderer disconnected after {}s - connections: {}",
                client.connected_at.elapsed().as_secs(),
                self.clients.len()
            );
        }
    }

    /// Clean up the socket file on shutdown.
    fn cleanup(&self) -> Result<()> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).with_context(|| {
                format!("failed to remove socket file: {}", self.socket_path.display())
            })?;
        }
        Ok(())
    }
}

/// Socket path for the renderer IPC.
///
/// Primary: `$XDG_RUNTIME_DIR/auroranotify-ui.sock`,
/// fallback: `/run/user/{uid}/auroranotify-ui.sock`.
pub fn socket_path() -> PathBuf {
    let runtime_dir = if let Ok(xdg_runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(xdg_runtime_dir)
    } else {
        PathBuf::from(format!("/run/user/{}", getuid()))
    };
    runtime_dir.join(SOCKET_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_path() {
        let path = socket_path();
        assert!(path.to_string_lossy().contains("auroranotify-ui.sock"));
    }

    #[test]
    fn test_server_creation_and_cleanup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let socket_path = temp_dir.path().join("test-auroranotify.sock");

        let server = RendererSocketServer::new(socket_path.clone()).unwrap();
        assert!(socket_path.exists());

        server.cleanup().unwrap();
        assert!(!socket_path.exists());
    }

    #[test]
    fn oversized_partial_line_disconnects_client() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("test-interactions.sock");
        let mut server = RendererSocketServer::new(path.clone()).unwrap();

        let mut client = UnixStream::connect(&path).unwrap();
        server.accept(false).unwrap();
        assert_eq!(server.clients.len(), 1);

        let (tx, rx) = std::sync::mpsc::channel();

        // A well-formed line is forwarded as an interaction
        client
            .write_all(b"{\"interaction\":\"activate\"}\n")
            .unwrap();
        thread::sleep(Duration::from_millis(50));
        server.poll_clients(&tx, false);
        assert!(matches!(
            rx.try_recv(),
            Ok(Event::Interaction(InteractionEvent::Activate))
        ));

        // Newline-free garbage past the cap gets the client dropped
        client
            .write_all(&vec![b'x'; MAX_LINE_LENGTH + 1024])
            .unwrap();
        thread::sleep(Duration::from_millis(50));
        server.poll_clients(&tx, false);
        assert!(server.clients.is_empty());
    }

    #[test]
    fn snapshot_replays_latest_surface_only() {
        let mut snapshot = SurfaceSnapshot::default();
        snapshot.apply(&RenderEffect::surface_visible(true));
        snapshot.apply(&RenderEffect::visual_class("dot", true));
        snapshot.apply(&RenderEffect::visual_class("pill", true));
        snapshot.apply(&RenderEffect::RenderPill {
            summary: "old".into(),
        });
        snapshot.apply(&RenderEffect::RenderPill {
            summary: "new".into(),
        });
        snapshot.apply(&RenderEffect::visual_class("dot", false));

        let replay = snapshot.replay();
        assert_eq!(
            replay,
            vec![
                RenderEffect::surface_visible(true),
                RenderEffect::visual_class("dot", false),
                RenderEffect::visual_class("pill", true),
                RenderEffect::RenderPill {
                    summary: "new".into()
                },
            ]
        );
    }
}
