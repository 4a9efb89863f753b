//! Game state engine for the maze race.
//!
//! Everything here is synchronous and lock-free on purpose: the server
//! wraps one [`GameState`] in a single mutex, and every operation below is
//! a read-modify-write that runs entirely inside that critical section.
//!
//! # Key types
//!
//! - [`Maze`]: perfect-maze generator and the grid it produces
//! - [`MazeDimensions`] / [`MazeSize`]: validated sizes and presets
//! - [`PlayerRegistry`]: one [`Player`] per live connection
//! - [`RoundState`] / [`RoundPhase`]: finish ranking and game-over
//! - [`GameState`]: the container tying the three together

mod config;
mod error;
mod maze;
mod registry;
mod round;
mod state;

pub use config::{MazeDimensions, MazeSize};
pub use error::GameError;
pub use maze::{Cell, Maze};
pub use registry::{DEFAULT_COLOR, DEFAULT_NAME, Player, PlayerRegistry};
pub use round::{FinishRecord, RoundPhase, RoundState};
pub use state::{GameState, UpdateOutcome};
