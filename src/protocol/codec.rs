//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol. Pure functions
//! over byte buffers; all I/O lives in the transport layer.
//!
//! ## Wire Format
//!
//! ### Connect Packet
//! ```text
//! ┌──────────┬──────────┬───────────────┬──────────┬───────────────┐
//! │ Op (1)   │ ULen (1) │ Username (16) │ PLen (1) │ Password (16) │
//! └──────────┴──────────┴───────────────┴──────────┴───────────────┘
//! ```
//! Credentials are UTF-8, truncated to the 16-byte field width *before*
//! the length prefix is computed, then right-padded with zero bytes.
//!
//! ### JoinGame Packet
//! ```text
//! ┌──────────┬──────────────────┐
//! │ Op (1)   │ GameId (4, BE)   │
//! └──────────┴──────────────────┘
//! ```
//!
//! All other packets are a single opcode byte.
//!
//! ### Response Format
//! ```text
//! ┌───────────┬──────────┬─────────────────────┐
//! │ Status(1) │ Len (1)  │   Message (Len)     │
//! └───────────┴──────────┴─────────────────────┘
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::{Opcode, Packet, Response};
use crate::error::{ParlorError, Result};

/// Fixed width of the username/password fields (wire revision 1)
pub const CREDENTIAL_FIELD_WIDTH: usize = 16;

/// Total size of an encoded Connect packet
pub const CONNECT_PACKET_SIZE: usize = 1 + 2 * (1 + CREDENTIAL_FIELD_WIDTH);

/// Response header size: 1 byte status + 1 byte message length
pub const RESPONSE_HEADER_SIZE: usize = 2;

/// Largest possible response: header plus a 255-byte message
pub const MAX_RESPONSE_SIZE: usize = RESPONSE_HEADER_SIZE + u8::MAX as usize;

// =============================================================================
// Packet Encoding
// =============================================================================

/// Encode a packet to bytes
///
/// Produces the exact layouts documented above. Never fails: credentials
/// are re-truncated to the field width here even if the caller already
/// clipped them.
pub fn encode_packet(packet: &Packet) -> Bytes {
    let mut buf = BytesMut::with_capacity(CONNECT_PACKET_SIZE);
    buf.put_u8(packet.opcode() as u8);

    match packet {
        Packet::Connect { username, password } => {
            put_credential(&mut buf, username);
            put_credential(&mut buf, password);
        }
        Packet::JoinGame { game_id } => {
            buf.put_u32(*game_id);
        }
        Packet::ListGames
        | Packet::Disconnect
        | Packet::CreateGame
        | Packet::Quit
        | Packet::Abandon
        | Packet::GameOver => {}
    }

    buf.freeze()
}

/// Write one length-prefixed, zero-padded credential field
fn put_credential(buf: &mut BytesMut, value: &str) {
    let clipped = clip_to_field(value);
    buf.put_u8(clipped.len() as u8);
    buf.put_slice(clipped);
    buf.put_bytes(0, CREDENTIAL_FIELD_WIDTH - clipped.len());
}

/// Truncate a credential to the field width without splitting a UTF-8
/// character. The length prefix reflects the clipped byte length, not the
/// field width.
fn clip_to_field(value: &str) -> &[u8] {
    if value.len() <= CREDENTIAL_FIELD_WIDTH {
        return value.as_bytes();
    }
    let mut end = CREDENTIAL_FIELD_WIDTH;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].as_bytes()
}

// =============================================================================
// Packet Decoding
// =============================================================================

/// Decode the credential fields of an encoded Connect packet
///
/// Returns the username and password with padding stripped. The inverse of
/// `encode_packet` for the one packet type that carries strings.
pub fn decode_connect(bytes: &[u8]) -> Result<(String, String)> {
    if bytes.len() < CONNECT_PACKET_SIZE {
        return Err(ParlorError::MalformedResponse(format!(
            "incomplete connect packet: expected {} bytes, got {}",
            CONNECT_PACKET_SIZE,
            bytes.len()
        )));
    }
    if bytes[0] != Opcode::Connect as u8 {
        return Err(ParlorError::MalformedResponse(format!(
            "not a connect packet: opcode 0x{:02x}",
            bytes[0]
        )));
    }

    let username = read_credential(&bytes[1..])?;
    let password = read_credential(&bytes[1 + 1 + CREDENTIAL_FIELD_WIDTH..])?;
    Ok((username, password))
}

/// Read one length-prefixed credential field (prefix byte + fixed field)
fn read_credential(field: &[u8]) -> Result<String> {
    let len = field[0] as usize;
    if len > CREDENTIAL_FIELD_WIDTH {
        return Err(ParlorError::MalformedResponse(format!(
            "credential length {} exceeds field width {}",
            len, CREDENTIAL_FIELD_WIDTH
        )));
    }
    let raw = &field[1..1 + len];
    let value = std::str::from_utf8(raw)
        .map_err(|e| ParlorError::MalformedResponse(format!("credential is not UTF-8: {e}")))?;
    Ok(value.to_string())
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Decode a response from bytes
///
/// Fails with `MalformedResponse` when fewer than 2 bytes are supplied,
/// when the declared message length exceeds the remaining bytes, or when
/// the message is not UTF-8. Trailing whitespace and NUL padding are
/// trimmed from the message.
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    if bytes.len() < RESPONSE_HEADER_SIZE {
        return Err(ParlorError::MalformedResponse(format!(
            "incomplete header: expected {} bytes, got {}",
            RESPONSE_HEADER_SIZE,
            bytes.len()
        )));
    }

    let status = bytes[0];
    let msg_len = bytes[1] as usize;

    let total_len = RESPONSE_HEADER_SIZE + msg_len;
    if bytes.len() < total_len {
        return Err(ParlorError::MalformedResponse(format!(
            "incomplete message: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    let raw = &bytes[RESPONSE_HEADER_SIZE..total_len];
    let message = std::str::from_utf8(raw)
        .map_err(|e| ParlorError::MalformedResponse(format!("message is not UTF-8: {e}")))?
        .trim_end_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string();

    Ok(Response { status, message })
}
