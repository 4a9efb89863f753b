//! WebSocket connection built on `axum`'s upgraded socket.

use std::net::SocketAddr;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::Mutex;

use crate::{Connection, ConnectionId, TransportError};

/// A single WebSocket connection.
///
/// The socket is split so the read half and write half each sit behind
/// their own lock. A task parked in `recv` never blocks a concurrent
/// `send` from the writer task.
pub struct WebSocketConnection {
    id: ConnectionId,
    remote_addr: SocketAddr,
    sink: Mutex<SplitSink<WebSocket, Message>>,
    stream: Mutex<SplitStream<WebSocket>>,
}

impl WebSocketConnection {
    /// Wraps an upgraded socket and assigns it a fresh [`ConnectionId`].
    pub fn new(socket: WebSocket, remote_addr: SocketAddr) -> Self {
        let id = ConnectionId::next();
        let (sink, stream) = socket.split();
        tracing::debug!(%id, %remote_addr, "accepted WebSocket connection");
        Self {
            id,
            remote_addr,
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        }
    }

    /// Address of the remote peer.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, text: &str) -> Result<(), Self::Error> {
        let msg = Message::Text(text.to_owned().into());
        self.sink
            .lock()
            .await
            .send(msg)
            .await
            .map_err(|e| TransportError::Send {
                conn: self.id,
                source: e.into(),
            })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_str().as_bytes().to_vec()));
                }
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong are answered by axum
                Some(Err(e)) => {
                    return Err(TransportError::Receive {
                        conn: self.id,
                        source: e.into(),
                    });
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.sink
            .lock()
            .await
            .send(Message::Close(None))
            .await
            .map_err(|e| {
                tracing::trace!(conn = %self.id, error = %e, "close frame not sent");
                TransportError::Closed(self.id)
            })
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
