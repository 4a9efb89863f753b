use mazerace_transport::ConnectionId;

/// Errors that can occur while mutating game state.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The connection has no player record (never registered, or
    /// already unregistered).
    #[error("no player registered for {0}")]
    PlayerNotFound(ConnectionId),

    /// Maze dimensions must both be odd and at least the minimum side.
    #[error(
        "invalid maze dimensions {width}x{height}: both sides must be odd and >= {min}",
        min = crate::MazeDimensions::MIN_SIDE
    )]
    InvalidDimensions { width: usize, height: usize },
}
