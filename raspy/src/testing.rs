//! Scripted in-memory transport for tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use raspy_core::{DataPacket, Frame, LengthHeader};
use raspy_transport::{Error, Result, Transport};

/// Serves queued reply bytes and records every write
///
/// Clones share the same script, so a test can keep one handle while the
/// sensor owns the other.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    inner: Arc<Mutex<Script>>,
}

#[derive(Default)]
struct Script {
    incoming: VecDeque<u8>,
    sent: Vec<Vec<u8>>,
    reads: usize,
    closed: bool,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw reply bytes
    pub fn reply(&self, bytes: &[u8]) {
        self.inner.lock().unwrap().incoming.extend(bytes);
    }

    /// Queue a well-formed reply frame
    pub fn reply_frame(&self, command: u8, params: [u8; 3]) {
        self.reply(&Frame::from_raw(command, params).encode());
    }

    /// Queue a success length header followed by its data packet
    pub fn reply_packet(&self, command: u8, payload: &[u8]) {
        let header = LengthHeader {
            command,
            len: payload.len() as u16,
            status: 0,
        };
        self.reply(&header.to_frame().encode());
        self.reply(&DataPacket::new(payload.to_vec()).encode());
    }

    /// Everything written so far, one entry per `send`
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().sent.len()
    }

    pub fn reads(&self) -> usize {
        self.inner.lock().unwrap().reads
    }

    /// Reply bytes not consumed yet
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().incoming.len()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&mut self, data: &[u8]) -> Result<usize> {
        let mut script = self.inner.lock().unwrap();
        if script.closed {
            return Err(Error::NotOpen);
        }
        script.sent.push(data.to_vec());
        Ok(data.len())
    }

    async fn receive_exact(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut script = self.inner.lock().unwrap();
        if script.closed {
            return Err(Error::NotOpen);
        }
        script.reads += 1;

        let available = script.incoming.len();
        if available == 0 && !buf.is_empty() {
            return Err(Error::ConnectionClosed);
        }
        if available < buf.len() {
            script.incoming.clear();
            return Err(Error::ShortRead {
                expected: buf.len(),
                actual: available,
            });
        }

        for slot in buf.iter_mut() {
            *slot = script.incoming.pop_front().unwrap_or_default();
        }
        Ok(buf.len())
    }

    async fn close(&mut self) -> Result<()> {
        self.inner.lock().unwrap().closed = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.inner.lock().unwrap().closed
    }

    fn peer(&self) -> String {
        "scripted".into()
    }
}
