//! # Parlor
//!
//! TCP client for a turn-based multiplayer lobby protocol:
//! - Binary packet codec (pure encode/decode, no I/O)
//! - Session state machine driving a fixed sequence of connection states
//! - Blocking TCP transport with timeouts
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Console Driver                          │
//! │               (credentials, menu choices)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Session State Machine                       │
//! │        Initial → Connected → Lobby → ActiveGame              │
//! └──────────┬──────────────────────────────────────┬───────────┘
//!            │                                      │
//!            ▼                                      ▼
//!     ┌─────────────┐                       ┌─────────────┐
//!     │    Codec    │                       │  Transport  │
//!     │ (pure enc/  │                       │    (TCP)    │
//!     │   decode)   │                       └─────────────┘
//!     └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod protocol;
pub mod session;
pub mod transport;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use error::{ParlorError, Result};
pub use session::{ConnectionState, Session};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Parlor
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
