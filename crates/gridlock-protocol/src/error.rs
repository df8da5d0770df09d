//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
///
/// The inner `serde_json::Error` is kept so logs show the exact parse
/// position, but callers deal with `ProtocolError` uniformly.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, an unknown
    /// `type` tag, or truncated frames. The connection handler treats this
    /// the same as a peer disconnect.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
