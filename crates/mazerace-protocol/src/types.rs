//! Wire types for the maze race.
//!
//! Every struct here is serialized as JSON with camelCase field names,
//! because the browser client reads them directly (`state.allFinished`,
//! `player.finishRank`, ...).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// A position/status report sent by a client over the live channel.
///
/// Coordinates and the finished flag are client-authoritative: the server
/// stores them as reported without checking them against the maze.
///
/// `#[serde(default)]` lets clients omit fields; anything missing decodes
/// as zero / empty / `false`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientUpdate {
    /// Column of the player's current cell.
    pub x: i64,
    /// Row of the player's current cell.
    pub y: i64,
    /// Display name.
    pub name: String,
    /// Display color, opaque to the server (usually a CSS color).
    pub color: String,
    /// `true` once the client believes it has reached the goal.
    pub finished: bool,
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// One player as seen by every client in a state push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub x: i64,
    pub y: i64,
    pub name: String,
    pub color: String,
    pub finished: bool,
    /// 1-based finishing position; 0 while unranked.
    pub finish_rank: u32,
    /// Whole seconds from round start to the moment of finishing.
    pub finish_time: u64,
}

/// The state snapshot pushed to every client after each mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateBroadcast {
    /// Every currently connected player is finished (and there is at
    /// least one player).
    pub all_finished: bool,
    /// All connected players, in no particular order.
    pub players: Vec<PlayerView>,
    /// Sticky round-over flag; stays set until the next reset even if
    /// players leave afterwards.
    pub game_over: bool,
}

// ---------------------------------------------------------------------------
// HTTP query responses
// ---------------------------------------------------------------------------

/// Cell codes of the current maze: `height` rows of `width` cells,
/// `0` for a passage and `1` for a wall.
pub type MazeGrid = Vec<Vec<u8>>;

/// Geometry of the current maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeInfo {
    pub goal_x: usize,
    pub goal_y: usize,
    pub width: usize,
    pub height: usize,
}

/// Acknowledgement returned by the reset trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetAck {
    pub ok: bool,
}
