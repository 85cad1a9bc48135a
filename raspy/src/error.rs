//! High-level error types

use raspy_core::{AckStatus, ProtocolViolation};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] raspy_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] raspy_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] raspy_types::Error),

    /// The sensor answered with a non-success status
    #[error("Sensor reported {0}")]
    Status(AckStatus),

    #[error("Sensor session closed")]
    Closed,
}

impl From<ProtocolViolation> for Error {
    fn from(violation: ProtocolViolation) -> Self {
        Self::Core(raspy_core::Error::ProtocolViolation(violation))
    }
}

impl Error {
    /// Check if the transport failed (I/O, disconnect, short read)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if a payload broke a length or record invariant
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_protocol_violation())
    }

    /// Status the sensor reported, if that is what failed
    pub fn status(&self) -> Option<AckStatus> {
        match self {
            Self::Status(status) => Some(*status),
            _ => None,
        }
    }
}
