//! Byte-stream transport
//!
//! Wraps any already-open tokio stream: a serial port stream opened by the
//! host, a TCP socket to a UART bridge, or an in-memory pipe.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::{Transport, error::*, serial::SerialSettings};

/// Transport over an open byte stream
pub struct StreamTransport<S> {
    stream: Option<S>,
    peer: String,
    read_timeout: Option<Duration>,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an open stream
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream: Some(stream),
            peer: peer.into(),
            read_timeout: None,
        }
    }

    /// Wrap a serial stream the host opened with `settings`
    ///
    /// The module only speaks 19200 8N1; other settings are accepted but
    /// logged, since the sensor will not answer on a misconfigured line.
    pub fn serial(stream: S, path: impl Into<String>, settings: SerialSettings) -> Self {
        let path = path.into();

        if !settings.matches_module() {
            warn!(
                "{} opened as {}, module expects {}",
                path,
                settings,
                SerialSettings::MODULE
            );
        }

        Self::new(stream, format!("{} ({})", path, settings))
    }

    /// Set read timeout
    ///
    /// Without one, a read waits until the sensor answers (it reports its
    /// own capture timeout) or the stream fails.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }
}

async fn read_fully<S>(stream: &mut S, buf: &mut [u8]) -> Result<usize>
where
    S: AsyncRead + Unpin,
{
    let mut filled = 0;

    while filled < buf.len() {
        let n = stream.read(&mut buf[filled..]).await?;

        if n == 0 {
            return Err(if filled == 0 {
                Error::ConnectionClosed
            } else {
                Error::ShortRead {
                    expected: buf.len(),
                    actual: filled,
                }
            });
        }

        filled += n;
    }

    Ok(filled)
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, data: &[u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(Error::NotOpen)?;

        trace!("Sending {} bytes: {}", data.len(), hex::encode(&data[..data.len().min(32)]));

        stream.write_all(data).await?;
        stream.flush().await?;

        Ok(data.len())
    }

    async fn receive_exact(&mut self, buf: &mut [u8]) -> Result<usize> {
        let read_timeout = self.read_timeout;
        let stream = self.stream.as_mut().ok_or(Error::NotOpen)?;

        let n = match read_timeout {
            Some(duration) => timeout(duration, read_fully(stream, buf))
                .await
                .map_err(|_| {
                    warn!("Read timeout after {:?}", duration);
                    Error::ReadTimeout
                })??,
            None => read_fully(stream, buf).await?,
        };

        trace!("Received {} bytes: {}", n, hex::encode(&buf[..n.min(32)]));

        Ok(n)
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Closing {}...", self.peer);

            // Graceful shutdown
            let _ = stream.shutdown().await;
        }

        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn peer(&self) -> String {
        self.peer.clone()
    }
}

impl<S> Drop for StreamTransport<S> {
    fn drop(&mut self) {
        if self.stream.is_some() {
            warn!("Transport to {} dropped while still open", self.peer);
        }
    }
}
