//! Renderer IPC over a Unix domain socket.
//!
//! The orchestrator's render effects are broadcast as JSON lines to every
//! connected renderer client, and interaction events (clicks, pointer
//! enter/leave) flow back on the same connection, also as JSON lines.

mod server;

pub use server::{RendererSocketServer, socket_path};
