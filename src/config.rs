//! Configuration for the Parlor client
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for a client session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub server_addr: String,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Receive timeout for request/response exchanges (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Send timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Session Configuration
    // -------------------------------------------------------------------------
    /// How long to wait for an opponent in the lobby (milliseconds).
    ///
    /// 0 means wait forever, which matches the legacy server's behavior:
    /// the lobby push arrives whenever a peer joins, with no upper bound.
    pub lobby_wait_timeout_ms: u64,

    /// Delay before the game-over exchange is initiated (milliseconds)
    pub game_settle_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:55555".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            lobby_wait_timeout_ms: 0,
            game_settle_delay_ms: 1000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address (host:port)
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the receive timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the send timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the lobby wait timeout (in milliseconds, 0 = wait forever)
    pub fn lobby_wait_timeout_ms(mut self, ms: u64) -> Self {
        self.config.lobby_wait_timeout_ms = ms;
        self
    }

    /// Set the delay before the game-over exchange (in milliseconds)
    pub fn game_settle_delay_ms(mut self, ms: u64) -> Self {
        self.config.game_settle_delay_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
