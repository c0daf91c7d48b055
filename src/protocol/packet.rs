//! Packet definitions
//!
//! Represents outbound protocol messages.

/// Wire opcodes
///
/// The single leading byte identifying a packet's type on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Connect = 0x0A,
    ListGames = 0x15,
    Disconnect = 0x16,
    CreateGame = 0x17,
    Quit = 0x1F,
    Abandon = 0x28,
    GameOver = 0x29,
    JoinGame = 0x2A,
}

/// An outbound protocol message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Authenticate with the lobby service
    Connect { username: String, password: String },

    /// Ask for the list of open games
    ListGames,

    /// Log out, returning to the unauthenticated state
    Disconnect,

    /// Create a new game and wait for an opponent
    CreateGame,

    /// Leave the service entirely
    Quit,

    /// Abandon the active game
    Abandon,

    /// Conclude the active game and request the result
    GameOver,

    /// Join an existing game by identifier
    JoinGame { game_id: u32 },
}

impl Packet {
    /// Get the packet's opcode
    pub fn opcode(&self) -> Opcode {
        match self {
            Packet::Connect { .. } => Opcode::Connect,
            Packet::ListGames => Opcode::ListGames,
            Packet::Disconnect => Opcode::Disconnect,
            Packet::CreateGame => Opcode::CreateGame,
            Packet::Quit => Opcode::Quit,
            Packet::Abandon => Opcode::Abandon,
            Packet::GameOver => Opcode::GameOver,
            Packet::JoinGame { .. } => Opcode::JoinGame,
        }
    }
}
