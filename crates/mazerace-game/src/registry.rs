//! The player registry: one record per live connection.
//!
//! Like the rest of this crate the registry is a plain single-threaded
//! structure. It is only ever touched through [`GameState`](crate::GameState),
//! which the server keeps behind a single lock together with the round
//! state, so a player's finish flag and the shared rank counter always
//! change together.

use std::collections::HashMap;

use mazerace_protocol::{ClientUpdate, PlayerView};
use mazerace_transport::ConnectionId;

use crate::{GameError, Maze};

/// Name shown until the client reports its own.
pub const DEFAULT_NAME: &str = "Anon";
/// Color shown until the client reports its own.
pub const DEFAULT_COLOR: &str = "#ff0000";

/// Server-side record of one connected player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub x: i64,
    pub y: i64,
    pub name: String,
    pub color: String,
    /// Once set, only a round reset clears it.
    pub finished: bool,
    /// 1-based finishing position, 0 while unranked.
    pub finish_rank: u32,
    /// Whole seconds from round start to finishing.
    pub finish_time: u64,
}

impl Player {
    /// A fresh, unfinished player standing on the start cell.
    pub fn spawn() -> Self {
        let (x, y) = Maze::START;
        Self {
            x: x as i64,
            y: y as i64,
            name: DEFAULT_NAME.to_string(),
            color: DEFAULT_COLOR.to_string(),
            finished: false,
            finish_rank: 0,
            finish_time: 0,
        }
    }

    /// Sends the player back to the start and clears its finish.
    /// Name and color survive.
    pub fn respawn(&mut self) {
        let (x, y) = Maze::START;
        self.x = x as i64;
        self.y = y as i64;
        self.finished = false;
        self.finish_rank = 0;
        self.finish_time = 0;
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            x: self.x,
            y: self.y,
            name: self.name.clone(),
            color: self.color.clone(),
            finished: self.finished,
            finish_rank: self.finish_rank,
            finish_time: self.finish_time,
        }
    }
}

/// All players currently connected, keyed by connection.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashMap<ConnectionId, Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a freshly spawned player for `conn`.
    ///
    /// Connection ids are never reused, so this always creates a new
    /// record; registering the same id twice restarts that player.
    pub fn register(&mut self, conn: ConnectionId) -> &Player {
        self.players.insert(conn, Player::spawn());
        tracing::debug!(%conn, players = self.players.len(), "player registered");
        &self.players[&conn]
    }

    /// Removes the player for `conn`, returning its last state.
    /// A no-op for unknown connections.
    pub fn unregister(&mut self, conn: ConnectionId) -> Option<Player> {
        let removed = self.players.remove(&conn);
        if removed.is_some() {
            tracing::debug!(%conn, players = self.players.len(), "player unregistered");
        }
        removed
    }

    /// Overwrites position, name and color from a client report.
    ///
    /// Finish state is deliberately untouched here; the round state
    /// machine owns that transition.
    ///
    /// # Errors
    /// Returns [`GameError::PlayerNotFound`] if `conn` is not registered.
    pub fn update(
        &mut self,
        conn: ConnectionId,
        update: &ClientUpdate,
    ) -> Result<&mut Player, GameError> {
        let player = self
            .players
            .get_mut(&conn)
            .ok_or(GameError::PlayerNotFound(conn))?;
        player.x = update.x;
        player.y = update.y;
        player.name.clone_from(&update.name);
        player.color.clone_from(&update.color);
        Ok(player)
    }

    pub fn get(&self, conn: ConnectionId) -> Option<&Player> {
        self.players.get(&conn)
    }

    /// Point-in-time copy of every player. Order is unspecified.
    pub fn snapshot(&self) -> Vec<PlayerView> {
        self.players.values().map(Player::view).collect()
    }

    /// `true` when at least one player is registered and all are finished.
    pub fn all_finished(&self) -> bool {
        !self.players.is_empty() && self.players.values().all(|p| p.finished)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub(crate) fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.values_mut()
    }
}
