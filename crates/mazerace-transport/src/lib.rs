//! Transport layer for the maze race server.
//!
//! Provides the [`Connection`] trait that the session loop is written
//! against, plus a WebSocket implementation. Accepting connections is the
//! HTTP router's job (the WebSocket endpoint is upgraded from a normal HTTP
//! request), so this crate only deals with already-established links.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket connections via `axum`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::WebSocketConnection;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Next id handed out by [`ConnectionId::next`].
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one WebSocket link, and of the player riding on it.
///
/// Every accepted connection gets a fresh id; ids are never reused within
/// a process, so a reconnecting client always shows up as a new player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a raw id. Tests use this; live links get [`Self::next`].
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates the next process-unique id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value, as used in `conn-N`.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A single duplex connection carrying text messages.
///
/// Sending and receiving must be usable concurrently from different
/// tasks: one task sits in [`recv`](Connection::recv) while another
/// drains the outbound queue through [`send`](Connection::send).
pub trait Connection: Send + Sync + 'static {
    /// Failure type shared by all three I/O operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one text message to the remote peer.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Waits for the next client frame, text or binary, as raw bytes.
    ///
    /// `Ok(None)` means the peer went away cleanly.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Starts the close handshake from our side.
    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;
}
