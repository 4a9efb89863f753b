//! State fan-out to every connected client.
//!
//! Each connection owns a bounded outbound queue drained by its own writer
//! task. A broadcast snapshots the game under the state lock and pushes the
//! encoded message into every queue with `try_send`, so the network writes
//! themselves always happen outside the lock. Pushing while still holding
//! the lock keeps every queue in snapshot order.

use std::sync::Arc;

use mazerace_protocol::Codec;
use mazerace_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;

/// An encoded state message shared by all recipients.
pub(crate) type Frame = Arc<str>;

/// Sending half of one connection's outbound queue.
pub(crate) struct Outbox {
    tx: mpsc::Sender<Frame>,
}

impl Outbox {
    /// Creates a queue holding at most `capacity` undelivered frames.
    pub(crate) fn channel(capacity: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Queues a frame. A full or closed queue drops it for this recipient
    /// only; the session loop reaps dead connections on its own.
    fn deliver(&self, conn_id: ConnectionId, frame: &Frame) {
        if let Err(e) = self.tx.try_send(Arc::clone(frame)) {
            tracing::trace!(%conn_id, error = %e, "dropped state push");
        }
    }
}

/// Snapshots the game and queues the result for every client.
///
/// Called after every connect, disconnect, update and reset.
pub(crate) async fn broadcast<C: Codec>(state: &ServerState<C>) {
    let mut shared = state.shared.lock().await;
    let snapshot = shared.game.snapshot();

    let frame: Frame = match state.codec.encode(&snapshot) {
        Ok(text) => text.into(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode state broadcast");
            return;
        }
    };

    for (conn_id, outbox) in &shared.outboxes {
        outbox.deliver(*conn_id, &frame);
    }
}

/// Drains one connection's queue onto the socket until the queue closes
/// or a send fails.
pub(crate) async fn write_loop(
    conn: Arc<WebSocketConnection>,
    mut rx: mpsc::Receiver<Frame>,
) {
    while let Some(frame) = rx.recv().await {
        if let Err(e) = conn.send(&frame).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "send failed, writer stopping");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deliver_queues_frame() {
        let (outbox, mut rx) = Outbox::channel(4);
        let frame: Frame = Arc::from("{}");
        outbox.deliver(ConnectionId::new(1), &frame);
        assert_eq!(rx.recv().await.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_deliver_drops_when_full() {
        let (outbox, mut rx) = Outbox::channel(1);
        outbox.deliver(ConnectionId::new(1), &Arc::from("first"));
        outbox.deliver(ConnectionId::new(1), &Arc::from("second"));
        assert_eq!(rx.recv().await.as_deref(), Some("first"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_deliver_to_closed_queue_is_silent() {
        let (outbox, rx) = Outbox::channel(1);
        drop(rx);
        outbox.deliver(ConnectionId::new(1), &Arc::from("lost"));
    }
}
