//! Protocol Module
//!
//! Defines the wire protocol for talking to the lobby service.
//!
//! ## Protocol Format (Revision 1 - Simple Binary)
//!
//! ### Packet Format (outbound)
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Op (1)   │         Payload             │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! ### Packets
//! - 0x0A: CONNECT    - Payload: ulen (1) + username (16) + plen (1) + password (16)
//! - 0x15: LIST_GAMES - Payload: empty
//! - 0x16: DISCONNECT - Payload: empty
//! - 0x17: CREATE_GAME - Payload: empty
//! - 0x1F: QUIT       - Payload: empty
//! - 0x28: ABANDON    - Payload: empty
//! - 0x29: GAME_OVER  - Payload: empty
//! - 0x2A: JOIN_GAME  - Payload: game id (4, big-endian)
//!
//! ### Response Format (inbound)
//! ```text
//! ┌───────────┬──────────┬─────────────────────┐
//! │ Status(1) │ Len (1)  │   Message (Len)     │
//! └───────────┴──────────┴─────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0: OK (operation accepted)
//! - 3: OPPONENT_JOINED (pushed to a waiting game creator)
//! - other values are state-dependent and surfaced verbatim

mod codec;
mod packet;
mod response;

pub use codec::{
    decode_connect, decode_response, encode_packet, CONNECT_PACKET_SIZE,
    CREDENTIAL_FIELD_WIDTH, MAX_RESPONSE_SIZE, RESPONSE_HEADER_SIZE,
};
pub use packet::{Opcode, Packet};
pub use response::{Response, STATUS_OK, STATUS_OPPONENT_JOINED};
