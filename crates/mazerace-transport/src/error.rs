use crate::ConnectionId;

/// Boxed cause of a transport failure, whatever the socket library.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Ways a live connection can fail.
///
/// All of them end the session; none is retried.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Writing a frame to the peer failed.
    #[error("{conn}: send failed: {source}")]
    Send {
        conn: ConnectionId,
        #[source]
        source: BoxError,
    },

    /// Reading the next frame failed (reset, protocol violation, ...).
    #[error("{conn}: receive failed: {source}")]
    Receive {
        conn: ConnectionId,
        #[source]
        source: BoxError,
    },

    /// The close handshake could not be started because the socket is
    /// already gone.
    #[error("{0}: already closed")]
    Closed(ConnectionId),
}
