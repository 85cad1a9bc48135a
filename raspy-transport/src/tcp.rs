//! TCP transport
//!
//! For modules reached through a network-to-UART bridge (ser2net and the
//! like). The bridge forwards bytes unchanged, so the framing is the same as
//! on the serial line.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::{error::*, stream::StreamTransport};

/// TCP transport to a UART bridge
pub type TcpTransport = StreamTransport<TcpStream>;

/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

impl StreamTransport<TcpStream> {
    /// Connect to a bridge
    pub async fn connect(addr: impl Into<String>, port: u16) -> Result<Self> {
        Self::connect_with_timeout(addr, port, DEFAULT_CONNECT_TIMEOUT).await
    }

    /// Connect to a bridge with an explicit connection timeout
    pub async fn connect_with_timeout(
        addr: impl Into<String>,
        port: u16,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let addr = resolve_addr(&addr.into(), port).await?;

        debug!("Connecting to {}...", addr);

        let stream = timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| Error::ConnectionTimeout)?
            .map_err(Error::Io)?;

        // Frames are tiny; do not let Nagle hold them back
        stream.set_nodelay(true)?;

        debug!("Connected to {}", addr);

        Ok(Self::new(stream, addr.to_string()))
    }
}

/// Resolve address to SocketAddr
async fn resolve_addr(addr: &str, port: u16) -> Result<SocketAddr> {
    let addr_str = format!("{}:{}", addr, port);

    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
        .await
        .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
        .collect();

    addrs
        .first()
        .copied()
        .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))
}
