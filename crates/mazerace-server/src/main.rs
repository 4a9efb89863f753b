use std::path::PathBuf;

use clap::Parser;
use mazerace::prelude::*;

/// Real-time multiplayer maze race server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
    /// Maze size preset: small, medium, large or huge
    #[arg(short, long, default_value = "medium")]
    size: MazeSize,
    /// Custom maze width, overrides --size together with --height
    #[arg(long, requires = "height")]
    width: Option<usize>,
    /// Custom maze height, overrides --size together with --width
    #[arg(long, requires = "width")]
    height: Option<usize>,
    /// Directory of static client files served on unmatched paths
    #[arg(long)]
    static_dir: Option<PathBuf>,
    /// Undelivered state pushes buffered per client
    #[arg(long, default_value_t = 256)]
    queue_capacity: usize,
}

impl Args {
    fn maze_dimensions(&self) -> MazeDimensions {
        match (self.width, self.height) {
            (Some(width), Some(height)) => MazeDimensions::coerced(width, height),
            _ => self.size.dimensions(),
        }
    }

    fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind_addr: format!("{}:{}", self.host, self.port),
            maze: self.maze_dimensions(),
            outbound_capacity: self.queue_capacity,
            static_dir: self.static_dir,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), MazeRaceError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config();
    let server = MazeRaceServerBuilder::new().config(config).build().await?;
    tracing::info!(addr = %server.local_addr()?, "listening");

    server.run_until(shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
