//! Error types for the engine's outer boundaries.
//!
//! The rules themselves are total: an illegal or impossible move is an
//! empty result, never an error. Errors only arise when text coming from
//! outside (menus, the relay connection) cannot be understood.

use thiserror::Error;

/// A difficulty name that is not `easy`, `medium` or `hard`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct ParseDifficultyError(pub String);

/// Errors raised while encoding or decoding relay messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The line is not valid JSON for the expected message type.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A forwarded move payload does not describe a board move.
    #[error("invalid move payload: {reason}")]
    InvalidMove { reason: String },
}

/// Result type alias for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;
