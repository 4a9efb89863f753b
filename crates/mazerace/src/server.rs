//! `MazeRaceServer` builder and server loop.
//!
//! Ties the layers together: the HTTP router accepts connections and
//! upgrades WebSockets, sessions feed client updates into the shared
//! [`GameState`], and the broadcast engine fans snapshots back out.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use mazerace_game::{GameState, MazeDimensions};
use mazerace_protocol::{Codec, JsonCodec, MazeGrid, MazeInfo, StateBroadcast};
use mazerace_transport::ConnectionId;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::MazeRaceError;
use crate::broadcast::{Outbox, broadcast};
use crate::routes::router;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Everything behind the one state lock.
///
/// The outbound queues sit next to the game so that registering a player
/// and adding its queue happen in the same critical section as every
/// broadcast that might observe them.
pub(crate) struct Shared {
    pub(crate) game: GameState,
    pub(crate) outboxes: HashMap<ConnectionId, Outbox>,
}

/// Shared server state passed to each connection task and HTTP handler.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) shared: Mutex<Shared>,
    pub(crate) codec: C,
    pub(crate) outbound_capacity: usize,
}

impl<C: Codec> ServerState<C> {
    pub(crate) fn new(game: GameState, codec: C, outbound_capacity: usize) -> Self {
        Self {
            shared: Mutex::new(Shared {
                game,
                outboxes: HashMap::new(),
            }),
            codec,
            outbound_capacity,
        }
    }

    /// Starts a new round and tells every client.
    ///
    /// The lock is held while the maze is regenerated, so no update can
    /// interleave with a half-reset round.
    pub(crate) async fn reset(&self) {
        tracing::info!("game reset requested");
        self.shared.lock().await.game.reset();
        broadcast(self).await;
    }

    pub(crate) async fn maze_grid(&self) -> MazeGrid {
        self.shared.lock().await.game.maze().to_grid()
    }

    pub(crate) async fn maze_info(&self) -> MazeInfo {
        self.shared.lock().await.game.maze().info()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on for HTTP and WebSocket traffic.
    pub bind_addr: String,
    /// Size of every maze generated by this server.
    pub maze: MazeDimensions,
    /// Undelivered state pushes buffered per client before new ones are
    /// dropped for that client.
    pub outbound_capacity: usize,
    /// Directory served for any path not handled by the game routes.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            maze: MazeDimensions::default(),
            outbound_capacity: 256,
            static_dir: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and starting a maze race server.
///
/// # Example
///
/// ```rust,no_run
/// use mazerace::prelude::*;
///
/// # async fn start() -> Result<(), MazeRaceError> {
/// let server = MazeRaceServer::builder()
///     .bind("0.0.0.0:8080")
///     .maze(MazeSize::Large.dimensions())
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MazeRaceServerBuilder {
    config: ServerConfig,
}

impl MazeRaceServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the maze size.
    pub fn maze(mut self, dims: MazeDimensions) -> Self {
        self.config.maze = dims;
        self
    }

    /// Sets the per-client outbound queue capacity.
    pub fn outbound_capacity(mut self, capacity: usize) -> Self {
        self.config.outbound_capacity = capacity;
        self
    }

    /// Serves files from `dir` for paths the game routes don't handle.
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.static_dir = Some(dir.into());
        self
    }

    /// Binds the listener and generates the first maze.
    ///
    /// Uses `JsonCodec`, which is what browser clients speak.
    pub async fn build(self) -> Result<MazeRaceServer<JsonCodec>, MazeRaceError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, maze = %self.config.maze, "server bound");

        let state = Arc::new(ServerState::new(
            GameState::new(self.config.maze),
            JsonCodec,
            self.config.outbound_capacity,
        ));

        Ok(MazeRaceServer {
            listener,
            state,
            static_dir: self.config.static_dir,
        })
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A bound maze race server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct MazeRaceServer<C: Codec> {
    listener: TcpListener,
    state: Arc<ServerState<C>>,
    static_dir: Option<PathBuf>,
}

impl MazeRaceServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> MazeRaceServerBuilder {
        MazeRaceServerBuilder::new()
    }
}

impl<C: Codec> MazeRaceServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Returns an administrative handle onto the running game.
    pub fn handle(&self) -> RaceHandle<C> {
        RaceHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Serves HTTP and WebSocket traffic until the process is terminated.
    pub async fn run(self) -> Result<(), MazeRaceError> {
        self.run_until(std::future::pending()).await
    }

    /// Serves until `shutdown` resolves, then stops accepting new
    /// connections.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), MazeRaceError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("maze race server running");
        let app = router(Arc::clone(&self.state), self.static_dir.as_deref());
        axum::serve(
            self.listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;
        tracing::info!("maze race server stopped");
        Ok(())
    }
}

/// Cheap, cloneable access to the game for operators and tests.
pub struct RaceHandle<C: Codec> {
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Clone for RaceHandle<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: Codec> RaceHandle<C> {
    /// Starts a new round and broadcasts it.
    pub async fn reset(&self) {
        self.state.reset().await;
    }

    /// Cell codes of the current maze.
    pub async fn maze_grid(&self) -> MazeGrid {
        self.state.maze_grid().await
    }

    /// Goal and size of the current maze.
    pub async fn maze_info(&self) -> MazeInfo {
        self.state.maze_info().await
    }

    /// The message a broadcast would send right now.
    pub async fn snapshot(&self) -> StateBroadcast {
        self.state.shared.lock().await.game.snapshot()
    }

    /// Number of connected players.
    pub async fn player_count(&self) -> usize {
        self.state.shared.lock().await.game.registry().len()
    }
}
