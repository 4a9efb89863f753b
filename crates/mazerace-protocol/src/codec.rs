//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A "codec" converts between Rust types and the text frames that travel
//! over the WebSocket. The rest of the server only needs something that
//! implements [`Codec`], so the format can be swapped without touching the
//! session or broadcast code.
//!
//! Browsers parse every state push with `JSON.parse`, so the only codec
//! shipped is [`JsonCodec`].

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to text and decode bytes back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a received frame back into a value.
    ///
    /// Inbound frames are accepted as raw bytes because clients may send
    /// either text or binary WebSocket frames.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use mazerace_protocol::{ClientUpdate, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let update: ClientUpdate = codec
///     .decode(br##"{"x":3,"y":5,"name":"ada","color":"#00ff00","finished":false}"##)
///     .unwrap();
/// assert_eq!((update.x, update.y), (3, 5));
///
/// let text = codec.encode(&update).unwrap();
/// assert!(text.contains("\"name\":\"ada\""));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientUpdate, StateBroadcast};

    #[test]
    fn test_decode_rejects_malformed_json() {
        let result: Result<ClientUpdate, _> = JsonCodec.decode(b"{not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_wrong_field_type() {
        let result: Result<ClientUpdate, _> =
            JsonCodec.decode(br#"{"x":"left"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_empty_broadcast() {
        let text = JsonCodec.encode(&StateBroadcast::default()).unwrap();
        assert_eq!(
            text,
            r#"{"allFinished":false,"players":[],"gameOver":false}"#
        );
    }
}
