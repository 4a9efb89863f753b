//! Wire protocol for the maze race server.
//!
//! - **Types** ([`ClientUpdate`], [`StateBroadcast`], [`MazeInfo`], ...):
//!   the message structures that travel over HTTP and the WebSocket.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   converted to and from text frames.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! ```text
//! Transport (frames) → Protocol (ClientUpdate) → Game (registry, round)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientUpdate, MazeGrid, MazeInfo, PlayerView, ResetAck, StateBroadcast,
};
