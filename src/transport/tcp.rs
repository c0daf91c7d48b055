//! TCP Transport
//!
//! Blocking TCP implementation of the Transport trait.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{ParlorError, Result};
use crate::transport::Transport;

/// TCP connection to the lobby service
pub struct TcpTransport {
    stream: TcpStream,

    /// Peer address for logging
    peer_addr: String,

    /// Set once the stream has been shut down
    closed: bool,
}

impl TcpTransport {
    /// Connect to the server named in the config
    ///
    /// Resolves the address, applies the connect timeout, disables Nagle's
    /// algorithm and installs the configured read/write timeouts.
    pub fn connect(config: &Config) -> Result<Self> {
        let addr = config
            .server_addr
            .to_socket_addrs()
            .map_err(|e| ParlorError::Connect(format!("{}: {}", config.server_addr, e)))?
            .next()
            .ok_or_else(|| {
                ParlorError::Connect(format!("{}: no address resolved", config.server_addr))
            })?;

        let stream = if config.connect_timeout_ms > 0 {
            TcpStream::connect_timeout(&addr, Duration::from_millis(config.connect_timeout_ms))
        } else {
            TcpStream::connect(addr)
        }
        .map_err(|e| ParlorError::Connect(format!("{}: {}", config.server_addr, e)))?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            stream,
            peer_addr,
            closed: false,
        })
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()?;
        Ok(())
    }

    fn receive(&mut self, max_bytes: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; max_bytes];
        let n = self.stream.read(&mut buf)?;
        if n == 0 {
            tracing::debug!("Peer {} closed the connection", self.peer_addr);
            return Err(ParlorError::PeerClosed);
        }
        buf.truncate(n);
        Ok(buf)
    }

    fn set_receive_deadline(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout)?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        tracing::debug!("Closing connection to {}", self.peer_addr);
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // Peer may have shut the stream down first
            Err(ref e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
