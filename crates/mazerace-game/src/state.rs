//! The single container for everything a round shares.
//!
//! Maze, registry and round bookkeeping live in one struct so that one
//! lock around a `GameState` covers every cross-field invariant: a finish
//! flag, the rank it was given and the game-over check that follows are
//! always observed together.

use std::time::Instant;

use mazerace_protocol::{ClientUpdate, PlayerView, StateBroadcast};
use mazerace_transport::ConnectionId;

use crate::{
    FinishRecord, GameError, Maze, MazeDimensions, Player, PlayerRegistry,
    RoundPhase, RoundState,
};

/// What applying one client update changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// Set when this update was the player's finish edge.
    pub finish: Option<FinishRecord>,
    /// Set when this update ended the round.
    pub round_over: bool,
}

/// Shared state of one running race.
#[derive(Debug)]
pub struct GameState {
    maze: Maze,
    registry: PlayerRegistry,
    round: RoundState,
}

impl GameState {
    /// Generates a maze of the given size and opens the first round.
    pub fn new(dims: MazeDimensions) -> Self {
        Self::with_maze(Maze::generate(dims), Instant::now())
    }

    /// Opens the first round on an already generated maze.
    pub fn with_maze(maze: Maze, now: Instant) -> Self {
        Self {
            maze,
            registry: PlayerRegistry::new(),
            round: RoundState::new(now),
        }
    }

    /// Adds a new player at the start cell.
    pub fn register(&mut self, conn: ConnectionId) -> PlayerView {
        self.registry.register(conn).view()
    }

    /// Removes a player; other players' ranks are untouched.
    pub fn unregister(&mut self, conn: ConnectionId) -> Option<Player> {
        self.registry.unregister(conn)
    }

    /// Applies a client report stamped with the current time.
    ///
    /// # Errors
    /// Returns [`GameError::PlayerNotFound`] if `conn` is not registered.
    pub fn apply_update(
        &mut self,
        conn: ConnectionId,
        update: &ClientUpdate,
    ) -> Result<UpdateOutcome, GameError> {
        self.apply_update_at(conn, update, Instant::now())
    }

    /// Applies a client report as of `now`.
    ///
    /// Position, name and color are overwritten as reported. If the report
    /// says `finished` and the stored player is not yet finished, the
    /// player takes the next rank; repeats are ignored, and a report of
    /// `finished: false` never un-finishes anyone.
    ///
    /// # Errors
    /// Returns [`GameError::PlayerNotFound`] if `conn` is not registered.
    pub fn apply_update_at(
        &mut self,
        conn: ConnectionId,
        update: &ClientUpdate,
        now: Instant,
    ) -> Result<UpdateOutcome, GameError> {
        let player = self.registry.update(conn, update)?;

        let mut outcome = UpdateOutcome::default();
        if update.finished && !player.finished {
            let record = self.round.record_finish(now);
            player.finished = true;
            player.finish_rank = record.rank;
            player.finish_time = record.secs;
            tracing::info!(
                %conn,
                name = %player.name,
                rank = record.rank,
                secs = record.secs,
                "player finished"
            );
            outcome.finish = Some(record);
        }
        outcome.round_over = self.evaluate_round_over();
        Ok(outcome)
    }

    /// Ends the round if every registered player is finished.
    /// Returns `true` only on the transition.
    fn evaluate_round_over(&mut self) -> bool {
        if !self.registry.all_finished() || !self.round.conclude() {
            return false;
        }
        tracing::info!(
            round = self.round.number(),
            players = self.registry.len(),
            "game over: all players reached the goal"
        );
        true
    }

    /// Builds the message pushed to every client.
    ///
    /// Also re-evaluates the round: a disconnect can leave only finished
    /// players behind, which ends the round just like a finish would.
    pub fn snapshot(&mut self) -> StateBroadcast {
        self.evaluate_round_over();
        StateBroadcast {
            all_finished: self.registry.all_finished(),
            players: self.registry.snapshot(),
            game_over: self.round.phase().is_over(),
        }
    }

    /// Starts a new round on a freshly generated maze of the same size.
    pub fn reset(&mut self) {
        let maze = Maze::generate(self.maze.dimensions());
        self.reset_with_maze(maze, Instant::now());
    }

    /// Starts a new round on `maze` as of `now`: every player goes back to
    /// the start unfinished, the rank counter restarts at zero and the
    /// round-over flag clears.
    pub fn reset_with_maze(&mut self, maze: Maze, now: Instant) {
        self.maze = maze;
        self.registry.players_mut().for_each(Player::respawn);
        self.round.restart(now);
        tracing::info!(
            round = self.round.number(),
            players = self.registry.len(),
            dims = %self.maze.dimensions(),
            "round reset"
        );
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase()
    }

    pub fn is_game_over(&self) -> bool {
        self.round.phase().is_over()
    }
}
