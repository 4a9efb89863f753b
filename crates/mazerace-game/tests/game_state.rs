//! Integration tests for the round state machine driven through `GameState`.

use std::time::{Duration, Instant};

use mazerace_game::{GameError, GameState, Maze, MazeDimensions, RoundPhase};
use mazerace_protocol::{ClientUpdate, PlayerView};
use mazerace_transport::ConnectionId;
use rand::SeedableRng;
use rand::rngs::StdRng;

// =========================================================================
// Helpers
// =========================================================================

fn conn(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

fn seeded_maze(seed: u64) -> Maze {
    let dims = MazeDimensions::new(31, 21).unwrap();
    Maze::generate_with_rng(dims, &mut StdRng::seed_from_u64(seed))
}

fn game(start: Instant) -> GameState {
    GameState::with_maze(seeded_maze(1), start)
}

fn moving(name: &str, x: i64, y: i64) -> ClientUpdate {
    ClientUpdate {
        x,
        y,
        name: name.into(),
        color: "#3366ff".into(),
        finished: false,
    }
}

fn finishing(name: &str) -> ClientUpdate {
    ClientUpdate {
        x: 29,
        y: 19,
        finished: true,
        ..moving(name, 0, 0)
    }
}

fn find<'a>(players: &'a [PlayerView], name: &str) -> &'a PlayerView {
    players
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("no player named {name}"))
}

// =========================================================================
// Ranking
// =========================================================================

#[test]
fn test_two_player_race_scenario() {
    let start = Instant::now();
    let mut game = game(start);
    game.register(conn(1));
    game.register(conn(2));

    let first = game
        .apply_update_at(conn(1), &finishing("p1"), start + Duration::from_secs(20))
        .unwrap();
    assert_eq!(first.finish.map(|f| f.rank), Some(1));
    assert!(!first.round_over);
    let snap = game.snapshot();
    assert!(!snap.all_finished);
    assert!(!snap.game_over);

    let second = game
        .apply_update_at(conn(2), &finishing("p2"), start + Duration::from_secs(31))
        .unwrap();
    assert_eq!(second.finish.map(|f| f.rank), Some(2));
    assert!(second.round_over);

    let snap = game.snapshot();
    assert!(snap.all_finished);
    assert!(snap.game_over);
    let p1 = find(&snap.players, "p1");
    let p2 = find(&snap.players, "p2");
    assert_eq!((p1.finish_rank, p1.finish_time), (1, 20));
    assert_eq!((p2.finish_rank, p2.finish_time), (2, 31));
}

#[test]
fn test_ranks_match_arrival_order() {
    let start = Instant::now();
    let mut game = game(start);
    for id in 1..=5 {
        game.register(conn(id));
    }
    // Arrival order 4, 2, 5, 1, 3.
    let order = [4, 2, 5, 1, 3];
    for (i, id) in order.iter().enumerate() {
        let at = start + Duration::from_secs(10 + i as u64);
        game.apply_update_at(conn(*id), &finishing(&format!("p{id}")), at)
            .unwrap();
    }

    let snap = game.snapshot();
    let mut last_time = 0;
    for (i, id) in order.iter().enumerate() {
        let p = find(&snap.players, &format!("p{id}"));
        assert_eq!(p.finish_rank, i as u32 + 1);
        assert!(p.finish_time >= last_time);
        last_time = p.finish_time;
    }
}

#[test]
fn test_duplicate_finish_is_ignored() {
    let start = Instant::now();
    let mut game = game(start);
    game.register(conn(1));
    game.register(conn(2));

    game.apply_update_at(conn(1), &finishing("p1"), start + Duration::from_secs(5))
        .unwrap();
    let repeat = game
        .apply_update_at(conn(1), &finishing("p1"), start + Duration::from_secs(9))
        .unwrap();
    assert!(repeat.finish.is_none());
    assert_eq!(game.round().finish_counter(), 1);

    let player = game.registry().get(conn(1)).unwrap();
    assert_eq!((player.finish_rank, player.finish_time), (1, 5));
}

#[test]
fn test_unfinished_report_never_clears_finish() {
    let start = Instant::now();
    let mut game = game(start);
    game.register(conn(1));
    game.apply_update_at(conn(1), &finishing("p1"), start).unwrap();
    game.apply_update_at(conn(1), &moving("p1", 3, 3), start).unwrap();

    let player = game.registry().get(conn(1)).unwrap();
    assert!(player.finished);
    assert_eq!((player.x, player.y), (3, 3));
}

#[test]
fn test_update_for_unknown_connection_fails() {
    let mut game = game(Instant::now());
    let err = game.apply_update(conn(77), &moving("ghost", 1, 1)).unwrap_err();
    assert!(matches!(err, GameError::PlayerNotFound(_)));
}

// =========================================================================
// Game over
// =========================================================================

#[test]
fn test_game_over_is_sticky_after_disconnects() {
    let start = Instant::now();
    let mut game = game(start);
    game.register(conn(1));
    game.apply_update_at(conn(1), &finishing("solo"), start).unwrap();
    assert_eq!(game.phase(), RoundPhase::Over);

    game.unregister(conn(1));
    let snap = game.snapshot();
    assert!(snap.players.is_empty());
    assert!(!snap.all_finished);
    assert!(snap.game_over);
}

#[test]
fn test_game_over_not_set_with_empty_registry() {
    let mut game = game(Instant::now());
    let snap = game.snapshot();
    assert!(!snap.all_finished);
    assert!(!snap.game_over);
}

#[test]
fn test_disconnect_of_last_unfinished_player_ends_round() {
    let start = Instant::now();
    let mut game = game(start);
    game.register(conn(1));
    game.register(conn(2));
    game.apply_update_at(conn(1), &finishing("done"), start).unwrap();
    assert!(!game.is_game_over());

    game.unregister(conn(2));
    let snap = game.snapshot();
    assert!(snap.all_finished);
    assert!(snap.game_over);
}

#[test]
fn test_disconnect_does_not_touch_other_players() {
    let start = Instant::now();
    let mut game = game(start);
    for id in 1..=3 {
        game.register(conn(id));
    }
    game.apply_update_at(conn(1), &finishing("a"), start).unwrap();
    game.apply_update_at(conn(2), &finishing("b"), start).unwrap();
    game.unregister(conn(1));

    let snap = game.snapshot();
    assert_eq!(snap.players.len(), 2);
    assert!(snap.players.iter().all(|p| p.name != "a"));
    assert_eq!(find(&snap.players, "b").finish_rank, 2);

    game.apply_update_at(conn(3), &finishing("c"), start).unwrap();
    assert_eq!(game.registry().get(conn(3)).unwrap().finish_rank, 3);
}

// =========================================================================
// Reset
// =========================================================================

#[test]
fn test_reset_starts_a_clean_round() {
    let start = Instant::now();
    let mut game = game(start);
    game.register(conn(1));
    game.register(conn(2));
    game.apply_update_at(conn(1), &finishing("p1"), start).unwrap();
    game.apply_update_at(conn(2), &finishing("p2"), start).unwrap();
    assert!(game.is_game_over());

    let later = start + Duration::from_secs(120);
    let next_maze = seeded_maze(2);
    game.reset_with_maze(next_maze.clone(), later);

    assert_eq!(game.maze(), &next_maze);
    assert_eq!(game.phase(), RoundPhase::Active);
    assert_eq!(game.round().finish_counter(), 0);
    assert_eq!(game.round().number(), 2);

    let snap = game.snapshot();
    assert!(!snap.game_over);
    assert!(!snap.all_finished);
    for p in &snap.players {
        assert!(!p.finished);
        assert_eq!((p.x, p.y), (1, 1));
        assert_eq!((p.finish_rank, p.finish_time), (0, 0));
    }
    // Names survive a reset.
    find(&snap.players, "p1");

    // Ranking restarts at 1, timed from the new round start.
    let outcome = game
        .apply_update_at(conn(2), &finishing("p2"), later + Duration::from_secs(4))
        .unwrap();
    assert_eq!(outcome.finish.map(|f| (f.rank, f.secs)), Some((1, 4)));
}

#[test]
fn test_reset_regenerates_valid_maze() {
    let mut game = GameState::new(MazeDimensions::new(21, 15).unwrap());
    game.reset();
    let maze = game.maze();
    assert_eq!((maze.width(), maze.height()), (21, 15));
    assert!(maze.is_passage(1, 1));
    let (gx, gy) = maze.goal();
    assert!(maze.is_passage(gx, gy));
}

#[test]
fn test_players_joining_after_game_over_keep_it_sticky() {
    let start = Instant::now();
    let mut game = game(start);
    game.register(conn(1));
    game.apply_update_at(conn(1), &finishing("first"), start).unwrap();
    game.register(conn(2));

    let snap = game.snapshot();
    assert!(!snap.all_finished);
    assert!(snap.game_over);
}
