//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
///
/// Decode failures are expected traffic at a network boundary — the
/// connection handler logs and drops them rather than letting malformed
/// input anywhere near the engine.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (a value could not be turned into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing fields, an unknown
    /// action tag, or an unparseable card string.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
