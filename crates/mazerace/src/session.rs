//! Per-connection session: register, read loop, cleanup.
//!
//! Each upgraded WebSocket gets its own Tokio task running this session,
//! plus a writer task draining its outbound queue. The flow is:
//!   1. Register the player at the start cell, add its queue → broadcast
//!   2. Loop: receive a `ClientUpdate` → apply under the lock → broadcast
//!   3. On clean close, transport error or malformed input: unregister,
//!      close the socket → broadcast the departure

use std::sync::Arc;
use std::time::Instant;

use mazerace_protocol::{ClientUpdate, Codec};
use mazerace_transport::{Connection, WebSocketConnection};

use crate::MazeRaceError;
use crate::broadcast::{Outbox, broadcast, write_loop};
use crate::server::ServerState;

/// Runs one connection from upgrade to close.
pub(crate) async fn run_session<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) {
    let started = Instant::now();
    let conn_id = conn.id();
    let remote_addr = conn.remote_addr();
    tracing::info!(%conn_id, %remote_addr, "new connection");

    let conn = Arc::new(conn);
    let (outbox, rx) = Outbox::channel(state.outbound_capacity);
    {
        let mut shared = state.shared.lock().await;
        shared.game.register(conn_id);
        shared.outboxes.insert(conn_id, outbox);
    }
    let writer = tokio::spawn(write_loop(Arc::clone(&conn), rx));
    broadcast(&state).await;

    match read_loop(&conn, &state).await {
        Ok(()) => tracing::debug!(%conn_id, "connection closed cleanly"),
        Err(e) => tracing::debug!(%conn_id, error = %e, "read error, closing"),
    }

    let departed = {
        let mut shared = state.shared.lock().await;
        shared.outboxes.remove(&conn_id);
        shared.game.unregister(conn_id)
    };
    writer.abort();
    if let Err(e) = conn.close().await {
        tracing::trace!(%conn_id, error = %e, "close after disconnect");
    }
    broadcast(&state).await;

    let name = departed.map(|p| p.name).unwrap_or_default();
    tracing::info!(
        %conn_id,
        %remote_addr,
        %name,
        duration = ?started.elapsed(),
        "connection closed"
    );
}

/// Applies client updates until the peer goes away.
///
/// Returns `Ok(())` on a clean close. A transport error or an undecodable
/// message ends the session the same way; neither is retried.
async fn read_loop<C: Codec>(
    conn: &WebSocketConnection,
    state: &ServerState<C>,
) -> Result<(), MazeRaceError> {
    let conn_id = conn.id();
    while let Some(data) = conn.recv().await? {
        let update: ClientUpdate = state.codec.decode(&data)?;
        state
            .shared
            .lock()
            .await
            .game
            .apply_update(conn_id, &update)?;
        broadcast(state).await;
    }
    Ok(())
}
