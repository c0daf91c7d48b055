//! Transport Module
//!
//! The byte-stream collaborator the session talks through.
//!
//! ## Architecture
//! - One transport per session, exclusively owned
//! - Blocking, half-duplex request/response discipline
//! - Closed exactly once, on the first fatal error or explicit quit

mod tcp;

use std::time::Duration;

use crate::error::Result;

pub use tcp::TcpTransport;

/// A reliable, ordered, connection-oriented byte stream.
///
/// The session performs one outstanding exchange at a time, so the trait is
/// deliberately blocking. A zero-length receive means the peer closed the
/// connection and is reported as `PeerClosed`.
pub trait Transport {
    /// Send all of `bytes` to the peer
    fn send(&mut self, bytes: &[u8]) -> Result<()>;

    /// Receive at most `max_bytes` from the peer
    ///
    /// Blocks until data arrives, the receive deadline elapses, or the
    /// connection fails.
    fn receive(&mut self, max_bytes: usize) -> Result<Vec<u8>>;

    /// Set or clear the deadline for subsequent receives
    ///
    /// `None` blocks indefinitely. The session widens the deadline for the
    /// lobby wait, the one receive not paired with a prior send.
    fn set_receive_deadline(&mut self, timeout: Option<Duration>) -> Result<()>;

    /// Close the transport. Idempotent.
    fn close(&mut self) -> Result<()>;
}
