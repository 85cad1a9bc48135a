//! Transport layer for the fingerprint module protocol
//!
//! Provides byte-stream communication with the sensor over an already-open
//! serial line, or over a TCP socket bridged to one.

pub mod error;
pub mod serial;
pub mod stream;
pub mod tcp;

pub use error::{Error, Result};
pub use serial::{Parity, SerialSettings};
pub use stream::StreamTransport;
pub use tcp::TcpTransport;

use async_trait::async_trait;

/// Transport trait for different communication methods
///
/// Both calls block (await) until done. The protocol never has more than
/// one exchange in flight, so implementations need no internal queuing.
#[async_trait]
pub trait Transport: Send {
    /// Write all of `data`, returning the number of bytes written
    async fn send(&mut self, data: &[u8]) -> Result<usize>;

    /// Fill `buf` completely
    ///
    /// Ending the stream before `buf` is full is [`Error::ShortRead`] (or
    /// [`Error::ConnectionClosed`] when nothing arrived at all).
    async fn receive_exact(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Close the underlying stream
    async fn close(&mut self) -> Result<()>;

    /// Check if open
    fn is_open(&self) -> bool;

    /// Describe the remote end (device path or socket address)
    fn peer(&self) -> String;
}
