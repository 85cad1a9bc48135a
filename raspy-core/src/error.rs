//! Error types for raspy-core

/// Result type alias for raspy-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame does not have the fixed 8-byte size
    #[error("Frame has wrong size: expected {expected} bytes, got {actual} bytes")]
    FrameSize {
        expected: usize,
        actual: usize,
    },

    /// Marker or checksum defect
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    /// Payload violates a fixed-length or record-count invariant
    #[error("Protocol violation: {0}")]
    ProtocolViolation(#[from] ProtocolViolation),

    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Unknown acknowledgement status code
    #[error("Unknown status code: 0x{0:02X}")]
    UnknownStatus(u8),

    /// Invalid session state
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),

    /// Payload too large for a length header
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
}

/// Defects in a frame or data packet envelope
///
/// These are tolerated on the receive path: the defect is logged and the
/// status byte the sensor sent still decides the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FramingError {
    #[error("bad marker at offset {offset}: 0x{found:02X}")]
    BadMarker {
        offset: usize,
        found: u8,
    },

    #[error("checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    ChecksumMismatch {
        expected: u8,
        received: u8,
    },

    #[error("reply echoes command 0x{received:02X}, sent 0x{sent:02X}")]
    CommandMismatch {
        sent: u8,
        received: u8,
    },
}

/// Hard local failures: the operation yields no data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolViolation {
    #[error("payload length {actual}, expected {expected}")]
    PayloadLength {
        expected: usize,
        actual: usize,
    },

    #[error("user table of {len} bytes cannot hold {max_id} records")]
    RecordCount {
        max_id: u16,
        len: usize,
    },

    #[error("record {index} is invalid: {reason}")]
    InvalidRecord {
        index: usize,
        reason: String,
    },
}

impl Error {
    /// Check if error is a tolerated envelope defect
    pub fn is_framing(&self) -> bool {
        matches!(self, Self::Framing(_) | Self::FrameSize { .. })
    }

    /// Check if error is a protocol violation
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::ProtocolViolation(_))
    }
}
