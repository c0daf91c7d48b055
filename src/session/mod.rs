//! Session Module
//!
//! The connection state machine. Owns the current `ConnectionState` and the
//! transport, decides the one legal outbound packet for each state, and
//! interprets the reply to compute the next state.
//!
//! ## State machine
//!
//! ```text
//!   Initial ──Connect──→ Connected ──CreateGame──→ Lobby ──opponent joined──→ ActiveGame
//!      ↑                  │  │  ↑                                                │  │
//!      └────Disconnect────┘  │  └────────────GameOver / Abandon──────────────────┘  │
//!                            └────────────────JoinGame──────────────────────────────┘
//! ```
//!
//! A transition is taken only after a successful decode of a Response; a
//! malformed reply fails the exchange without touching state. Unexpected
//! status codes are logged and leave the state unchanged.

use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ParlorError, Result};
use crate::protocol::{
    decode_response, encode_packet, Packet, Response, MAX_RESPONSE_SIZE, STATUS_OPPONENT_JOINED,
};
use crate::transport::{TcpTransport, Transport};

/// Menu input that creates a new game instead of joining one
pub const CREATE_GAME_CHOICE: &str = "-1";

/// The fixed sequence of connection states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not yet authenticated
    Initial,

    /// Authenticated, browsing the game list
    Connected,

    /// Created a game, waiting for an opponent to join
    Lobby,

    /// Playing a game
    ActiveGame,
}

/// A parsed menu choice from the Connected state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Create a new game and wait in the lobby
    Create,

    /// Join the game with the given identifier
    Join(u32),
}

/// Parse a raw menu string into a choice
///
/// `"-1"` creates a game; any non-negative integer joins that game id.
/// Anything else is `InvalidUserInput`: no packet is sent and the caller
/// re-prompts.
pub fn parse_menu_choice(raw: &str) -> Result<MenuChoice> {
    let trimmed = raw.trim();
    if trimmed == CREATE_GAME_CHOICE {
        return Ok(MenuChoice::Create);
    }
    trimmed.parse::<u32>().map(MenuChoice::Join).map_err(|_| {
        ParlorError::InvalidUserInput(format!(
            "expected {CREATE_GAME_CHOICE} to create a game or a non-negative game id, got {trimmed:?}"
        ))
    })
}

/// A single client session over one transport
///
/// Exactly one session exists per connection; it owns the transport for its
/// entire lifetime. State advances only inside the methods below, each a
/// pure function of the current state plus the decoded reply.
pub struct Session<T: Transport> {
    state: ConnectionState,
    transport: T,
    config: Config,

    /// Message text of the most recent successfully decoded response
    last_message: String,
}

impl Session<TcpTransport> {
    /// Connect to the server named in the config and start a session
    pub fn connect(config: Config) -> Result<Self> {
        let transport = TcpTransport::connect(&config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> Session<T> {
    /// Start a session in the `Initial` state over an open transport
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            state: ConnectionState::Initial,
            transport,
            config,
            last_message: String::new(),
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Message of the most recent response, for display
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    // -------------------------------------------------------------------------
    // State machine operations
    // -------------------------------------------------------------------------

    /// Authenticate with the lobby service (Initial state)
    ///
    /// Returns true if the session advanced to `Connected`; false if the
    /// server refused, in which case the state is unchanged and the reason
    /// is in `last_message`.
    pub fn submit_credentials(&mut self, username: &str, password: &str) -> Result<bool> {
        self.require_state(ConnectionState::Initial, "submit_credentials")?;

        let packet = Packet::Connect {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.exchange(&packet)?;

        if response.is_ok() {
            self.advance(ConnectionState::Connected);
            Ok(true)
        } else {
            tracing::debug!("Authentication refused (status {})", response.status);
            Ok(false)
        }
    }

    /// Fetch the list of open games (Connected state)
    ///
    /// The list arrives as the response message and is returned for
    /// display. Never changes state.
    pub fn list_games(&mut self) -> Result<&str> {
        self.require_state(ConnectionState::Connected, "list_games")?;
        self.exchange(&Packet::ListGames)?;
        Ok(self.last_message())
    }

    /// Act on a raw menu choice (Connected state)
    ///
    /// `"-1"` sends CreateGame and advances to `Lobby` on success; a game
    /// id sends JoinGame and advances to `ActiveGame` on success. Invalid
    /// input sends nothing and returns `InvalidUserInput`.
    pub fn submit_menu_choice(&mut self, raw: &str) -> Result<bool> {
        self.require_state(ConnectionState::Connected, "submit_menu_choice")?;

        match parse_menu_choice(raw)? {
            MenuChoice::Create => {
                let response = self.exchange(&Packet::CreateGame)?;
                if response.is_ok() {
                    self.advance(ConnectionState::Lobby);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            MenuChoice::Join(game_id) => {
                let response = self.exchange(&Packet::JoinGame { game_id })?;
                if response.is_ok() {
                    self.advance(ConnectionState::ActiveGame);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Block until an opponent joins the created game (Lobby state)
    ///
    /// The one receive not paired with a prior send: the server pushes a
    /// response when a peer joins. Waits forever unless a lobby timeout is
    /// configured, in which case `LobbyTimeout` is returned when it
    /// elapses. Any status other than "opponent joined" is logged and
    /// leaves the session in the lobby.
    pub fn await_opponent(&mut self) -> Result<bool> {
        self.require_state(ConnectionState::Lobby, "await_opponent")?;

        let lobby_deadline = match self.config.lobby_wait_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        self.transport.set_receive_deadline(lobby_deadline)?;
        let result = self.receive_response();
        let _ = self.restore_exchange_deadline();

        let response = match result {
            Ok(response) => response,
            Err(ParlorError::Io(ref e))
                if lobby_deadline.is_some()
                    && matches!(
                        e.kind(),
                        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                    ) =>
            {
                return Err(ParlorError::LobbyTimeout);
            }
            Err(e) => return Err(e),
        };

        if response.status == STATUS_OPPONENT_JOINED {
            self.advance(ConnectionState::ActiveGame);
            Ok(true)
        } else {
            self.note_unhandled_status(response.status);
            Ok(false)
        }
    }

    /// Conclude the active game and learn the result (ActiveGame state)
    ///
    /// Sleeps for the configured settle delay, then performs the GameOver
    /// exchange. On success the session returns to `Connected` and the
    /// result text is in `last_message`.
    pub fn conclude_game(&mut self) -> Result<bool> {
        self.require_state(ConnectionState::ActiveGame, "conclude_game")?;

        if self.config.game_settle_delay_ms > 0 {
            thread::sleep(Duration::from_millis(self.config.game_settle_delay_ms));
        }

        let response = self.exchange(&Packet::GameOver)?;
        if response.is_ok() {
            self.advance(ConnectionState::Connected);
            Ok(true)
        } else {
            self.note_unhandled_status(response.status);
            Ok(false)
        }
    }

    /// Abandon the active game without a result (ActiveGame state)
    pub fn abandon_game(&mut self) -> Result<bool> {
        self.require_state(ConnectionState::ActiveGame, "abandon_game")?;

        let response = self.exchange(&Packet::Abandon)?;
        if response.is_ok() {
            self.advance(ConnectionState::Connected);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Log out, returning to the unauthenticated state (Connected state)
    pub fn log_out(&mut self) -> Result<bool> {
        self.require_state(ConnectionState::Connected, "log_out")?;

        let response = self.exchange(&Packet::Disconnect)?;
        if response.is_ok() {
            self.advance(ConnectionState::Initial);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Leave the service and close the transport, consuming the session
    ///
    /// The Quit packet is best-effort: the server may already be gone, and
    /// the transport is closed either way.
    pub fn quit(mut self) -> Result<()> {
        let bytes = encode_packet(&Packet::Quit);
        let _ = self.transport.send(&bytes);
        self.transport.close()
    }

    /// Close the transport after a fatal error, keeping the session value
    /// around for inspection
    pub fn close(&mut self) -> Result<()> {
        self.transport.close()
    }

    // -------------------------------------------------------------------------
    // Exchange plumbing
    // -------------------------------------------------------------------------

    /// One half-duplex request/response exchange
    fn exchange(&mut self, packet: &Packet) -> Result<Response> {
        let bytes = encode_packet(packet);
        tracing::trace!("-> {:?} ({} bytes)", packet.opcode(), bytes.len());
        self.transport.send(&bytes)?;
        self.receive_response()
    }

    /// Receive and decode one response, recording its message
    ///
    /// A malformed buffer fails the exchange before `last_message` is
    /// touched, so a garbled reply cannot corrupt what the UI shows.
    fn receive_response(&mut self) -> Result<Response> {
        let raw = self.transport.receive(MAX_RESPONSE_SIZE)?;
        let response = decode_response(&raw)?;
        tracing::trace!("<- status {} {:?}", response.status, response.message);
        self.last_message = response.message.clone();
        Ok(response)
    }

    /// Reinstall the per-exchange receive deadline after a lobby wait
    fn restore_exchange_deadline(&mut self) -> Result<()> {
        let deadline = match self.config.read_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        self.transport.set_receive_deadline(deadline)
    }

    fn advance(&mut self, next: ConnectionState) {
        tracing::debug!("State {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn note_unhandled_status(&self, status: u8) {
        let violation = ParlorError::ProtocolViolation {
            state: self.state,
            status,
        };
        tracing::warn!("{violation}");
    }

    fn require_state(&self, expected: ConnectionState, op: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ParlorError::BadState {
                op,
                state: self.state,
            })
        }
    }
}
