//! Unified error type for the maze race server.

use mazerace_game::GameError;
use mazerace_protocol::ProtocolError;
use mazerace_transport::TransportError;

/// Anything that can stop a session or the server itself.
///
/// Lower-layer errors convert in through `?`; a session that hits one of
/// the first three closes its connection, while `Io` aborts the server.
#[derive(Debug, thiserror::Error)]
pub enum MazeRaceError {
    /// A transport-level error (send, recv, close).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A malformed client message or an unencodable server message.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A game state error (unknown player, bad dimensions).
    #[error(transparent)]
    Game(#[from] GameError),

    /// Binding or serving the listener failed.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
