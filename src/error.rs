//! Error types for Parlor
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::session::ConnectionState;

/// Result type alias using ParlorError
pub type Result<T> = std::result::Result<T, ParlorError>;

/// Unified error type for Parlor operations
#[derive(Debug, Error)]
pub enum ParlorError {
    // -------------------------------------------------------------------------
    // Transport Errors (fatal to the session)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Peer closed the connection")]
    PeerClosed,

    // -------------------------------------------------------------------------
    // Protocol Errors (recovered locally)
    // -------------------------------------------------------------------------
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unexpected status {status} in state {state:?}")]
    ProtocolViolation {
        state: ConnectionState,
        status: u8,
    },

    // -------------------------------------------------------------------------
    // Input Errors (recovered locally, nothing sent)
    // -------------------------------------------------------------------------
    #[error("Invalid input: {0}")]
    InvalidUserInput(String),

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    #[error("Timed out waiting for an opponent")]
    LobbyTimeout,

    #[error("Operation '{op}' is not legal in state {state:?}")]
    BadState {
        op: &'static str,
        state: ConnectionState,
    },
}

impl ParlorError {
    /// Whether this error terminates the session.
    ///
    /// Transport-level failures are fatal: the state machine does not retry
    /// or reconnect. Everything else is recovered locally by the caller
    /// (re-prompt, re-receive) without advancing state.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ParlorError::Io(_) | ParlorError::Connect(_) | ParlorError::PeerClosed
        )
    }
}
