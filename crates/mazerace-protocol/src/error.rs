//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
///
/// A decode error on an inbound client message ends that client's session;
/// the protocol layer itself never retries or repairs input.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into text).
    #[cfg(feature = "json")]
    #[error("could not encode server message: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, wrong field types, or
    /// a truncated frame.
    #[cfg(feature = "json")]
    #[error("malformed client message: {0}")]
    Decode(serde_json::Error),
}
