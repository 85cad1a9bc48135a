//! 8-byte frame structure and encoding/decoding

use std::fmt;

use tracing::warn;

use crate::{
    checksum,
    command::Command,
    constants::{FRAME_CHECKSUM_OFFSET, FRAME_LEN, MARKER, MAX_PAYLOAD_LEN},
    error::{Error, FramingError, Result},
};

/// Fixed-size command / reply frame
///
/// # Frame Structure
///
/// ```text
/// ┌──────┬─────────┬────┬────┬────┬──────────┬──────────┬──────┐
/// │ 0xF5 │ Command │ P1 │ P2 │ P3 │ Reserved │ Checksum │ 0xF5 │
/// │      │         │ Q1 │ Q2 │ Q3 │   (0)    │ XOR 0..6 │      │
/// └──────┴─────────┴────┴────┴────┴──────────┴──────────┴──────┘
/// ```
///
/// Requests carry parameters P1..P3, replies carry Q1..Q3 in the same slots.
///
/// # Examples
///
/// ```
/// use raspy_core::{Command, Frame};
///
/// let frame = Frame::new(Command::DeleteUser, 0x00, 0x07, 0x00);
/// let encoded = frame.encode();
/// assert_eq!(encoded, [0xF5, 0x04, 0x00, 0x07, 0x00, 0x00, 0xF6, 0xF5]);
///
/// let decoded = Frame::decode(&encoded).unwrap();
/// assert_eq!(decoded, frame);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Raw command code (echoed by the sensor in replies)
    pub command: u8,

    /// P1..P3 on requests, Q1..Q3 on replies
    pub params: [u8; 3],
}

impl Frame {
    /// Frame size in bytes
    pub const LEN: usize = FRAME_LEN;

    /// Create a request frame
    pub fn new(command: Command, p1: u8, p2: u8, p3: u8) -> Self {
        Self {
            command: command.into(),
            params: [p1, p2, p3],
        }
    }

    /// Create a frame from a raw command byte
    pub fn from_raw(command: u8, params: [u8; 3]) -> Self {
        Self { command, params }
    }

    pub fn q1(&self) -> u8 {
        self.params[0]
    }

    pub fn q2(&self) -> u8 {
        self.params[1]
    }

    /// Status slot of most replies
    pub fn q3(&self) -> u8 {
        self.params[2]
    }

    /// Q1:Q2 as a big-endian 16-bit value (user id, count, length)
    pub fn word(&self) -> u16 {
        u16::from_be_bytes([self.params[0], self.params[1]])
    }

    /// Encode frame to bytes
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut buf = [
            MARKER,
            self.command,
            self.params[0],
            self.params[1],
            self.params[2],
            0,
            0,
            MARKER,
        ];
        buf[FRAME_CHECKSUM_OFFSET] = checksum::calculate(&buf[..FRAME_CHECKSUM_OFFSET]);
        buf
    }

    /// Decode frame from bytes, rejecting any envelope defect
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is not exactly 8 bytes
    /// - A marker byte is not 0xF5
    /// - Checksum verification fails
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let (frame, defect) = Self::decode_lenient(buf)?;

        match defect {
            Some(defect) => Err(Error::Framing(defect)),
            None => Ok(frame),
        }
    }

    /// Decode frame from bytes, reporting envelope defects instead of failing
    ///
    /// The fields are returned even when a marker or the checksum is wrong;
    /// the caller decides from the status byte. Only a wrong buffer size is
    /// an error.
    pub fn decode_lenient(buf: &[u8]) -> Result<(Self, Option<FramingError>)> {
        if buf.len() != FRAME_LEN {
            return Err(Error::FrameSize {
                expected: FRAME_LEN,
                actual: buf.len(),
            });
        }

        let frame = Self {
            command: buf[1],
            params: [buf[2], buf[3], buf[4]],
        };

        let expected = checksum::calculate(&buf[..FRAME_CHECKSUM_OFFSET]);
        let defect = if buf[0] != MARKER {
            Some(FramingError::BadMarker {
                offset: 0,
                found: buf[0],
            })
        } else if buf[FRAME_LEN - 1] != MARKER {
            Some(FramingError::BadMarker {
                offset: FRAME_LEN - 1,
                found: buf[FRAME_LEN - 1],
            })
        } else if buf[FRAME_CHECKSUM_OFFSET] != expected {
            Some(FramingError::ChecksumMismatch {
                expected,
                received: buf[FRAME_CHECKSUM_OFFSET],
            })
        } else {
            None
        };

        if let Some(defect) = defect {
            warn!(frame = %hex::encode(buf), "Malformed frame: {}", defect);
        }

        Ok((frame, defect))
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("command", &format!("0x{:02X}", self.command))
            .field("params", &format!("{:02X?}", self.params))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Command::try_from(self.command) {
            Ok(command) => write!(f, "Frame[{}]({:02X?})", command, self.params),
            Err(_) => write!(f, "Frame[0x{:02X}]({:02X?})", self.command, self.params),
        }
    }
}

/// Length header announcing a data packet
///
/// Same shape as [`Frame`], but Q1:Q2 hold the big-endian payload length
/// and Q3 holds the status code (always 0 on requests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthHeader {
    pub command: u8,
    pub len: u16,
    pub status: u8,
}

impl LengthHeader {
    /// Create a request header for a payload of `len` bytes
    pub fn request(command: Command, len: usize) -> Result<Self> {
        let len = u16::try_from(len).map_err(|_| Error::PayloadTooLarge {
            size: len,
            max: MAX_PAYLOAD_LEN,
        })?;

        Ok(Self {
            command: command.into(),
            len,
            status: 0,
        })
    }

    /// Reinterpret a reply frame as a length header
    pub fn from_frame(frame: &Frame) -> Self {
        Self {
            command: frame.command,
            len: frame.word(),
            status: frame.q3(),
        }
    }

    pub fn to_frame(&self) -> Frame {
        let [hi, lo] = self.len.to_be_bytes();
        Frame::from_raw(self.command, [hi, lo, self.status])
    }

    /// Declared payload length
    pub fn payload_len(&self) -> usize {
        usize::from(self.len)
    }
}
