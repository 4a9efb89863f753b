//! # Maze Race
//!
//! Real-time multiplayer maze race server.
//!
//! The server generates a perfect maze, accepts WebSocket players, tracks
//! each player's position and finish rank, and pushes a consistent snapshot
//! of every player to every client after each change.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mazerace::prelude::*;
//!
//! # async fn start() -> Result<(), MazeRaceError> {
//! let server = MazeRaceServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```
//!
//! ## Endpoints
//!
//! | Route    | Purpose                                     |
//! |----------|---------------------------------------------|
//! | `/maze`  | current grid, `0` passage / `1` wall        |
//! | `/info`  | `{goalX, goalY, width, height}`             |
//! | `/reset` | start a new round, answers `{"ok": true}`   |
//! | `/ws`    | live channel for position updates and state |

mod broadcast;
mod error;
mod routes;
mod server;
mod session;

pub use error::MazeRaceError;
pub use server::{MazeRaceServer, MazeRaceServerBuilder, RaceHandle, ServerConfig};

pub mod prelude {
    pub use crate::{
        MazeRaceError, MazeRaceServer, MazeRaceServerBuilder, RaceHandle,
        ServerConfig,
    };
    pub use mazerace_game::{MazeDimensions, MazeSize};
    pub use mazerace_protocol::{
        ClientUpdate, Codec, JsonCodec, MazeInfo, PlayerView, ResetAck,
        StateBroadcast,
    };
}
