//! Session bookkeeping
//!
//! A session represents one open serial connection to a sensor and tracks:
//! - Open / closed state (the transport is closed exactly once)
//! - Frame and packet counters
//! - Envelope defects tolerated under the warn-and-proceed policy

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport open, requests may be issued
    Open,

    /// Transport closed
    Closed,
}

/// Counter snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames and data packets written
    pub sent: u64,

    /// Frames and data packets read
    pub received: u64,

    /// Marker / checksum defects seen on received units
    pub framing_faults: u64,
}

/// Session manager
///
/// Thread-safe and can be cloned cheaply (Arc internally), so a host can
/// keep a handle for monitoring while the sensor owns the transport.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    sent: AtomicU64,
    received: AtomicU64,
    framing_faults: AtomicU64,

    /// Current session state
    state: parking_lot::RwLock<SessionState>,
}

impl Session {
    /// Create a session for an already-open transport
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                sent: AtomicU64::new(0),
                received: AtomicU64::new(0),
                framing_faults: AtomicU64::new(0),
                state: parking_lot::RwLock::new(SessionState::Open),
            }),
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        *self.inner.state.read()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state(), SessionState::Open)
    }

    /// Fail unless the session is open
    pub fn ensure_open(&self) -> Result<()> {
        match self.state() {
            SessionState::Open => Ok(()),
            SessionState::Closed => Err(Error::InvalidSessionState(
                "session is closed".into(),
            )),
        }
    }

    /// Mark session as closed
    ///
    /// A session closes exactly once; a second close is an error.
    pub fn close(&self) -> Result<()> {
        let mut state = self.inner.state.write();

        if *state == SessionState::Closed {
            return Err(Error::InvalidSessionState(
                "session already closed".into(),
            ));
        }

        *state = SessionState::Closed;
        Ok(())
    }

    pub fn record_sent(&self) {
        self.inner.sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_received(&self) {
        self.inner.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_framing_fault(&self) {
        self.inner.framing_faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Get counter snapshot
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            sent: self.inner.sent.load(Ordering::Relaxed),
            received: self.inner.received.load(Ordering::Relaxed),
            framing_faults: self.inner.framing_faults.load(Ordering::Relaxed),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_new() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Open);
        assert!(session.is_open());
        assert_eq!(session.stats(), SessionStats::default());
    }

    #[test]
    fn test_session_close_once() {
        let session = Session::new();
        session.close().unwrap();

        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.ensure_open().is_err());
        assert!(session.close().is_err());
    }

    #[test]
    fn test_session_counters() {
        let session = Session::new();
        session.record_sent();
        session.record_received();
        session.record_received();
        session.record_framing_fault();

        assert_eq!(
            session.stats(),
            SessionStats {
                sent: 1,
                received: 2,
                framing_faults: 1,
            }
        );
    }

    #[test]
    fn test_session_clone() {
        let session1 = Session::new();
        let session2 = session1.clone();

        // Both share same state
        session1.record_sent();
        assert_eq!(session2.stats().sent, 1);

        session1.close().unwrap();
        assert!(!session2.is_open());
    }
}
