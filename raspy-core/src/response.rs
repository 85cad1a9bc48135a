//! Decoded sensor reply

use bytes::Bytes;

use crate::{frame::Frame, status::AckStatus};

/// Reply to one request
///
/// Created fresh per exchange and owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Q1..Q3 of the reply frame (or length header)
    pub params: [u8; 3],

    /// Payload of the data packet, when one followed
    pub payload: Option<Bytes>,

    /// Payload length declared by the length header
    pub payload_len: Option<usize>,
}

impl Response {
    /// Response carried by a short reply frame
    pub fn from_frame(frame: &Frame) -> Self {
        Self {
            params: frame.params,
            payload: None,
            payload_len: None,
        }
    }

    /// Response carried by a length header and its data packet
    pub fn with_payload(frame: &Frame, payload: Bytes) -> Self {
        Self {
            params: frame.params,
            payload_len: Some(payload.len()),
            payload: Some(payload),
        }
    }

    /// Raw status byte (Q3)
    pub fn status_byte(&self) -> u8 {
        self.params[2]
    }

    /// Q3 classified as an acknowledgement status
    pub fn status(&self) -> AckStatus {
        AckStatus::classify(self.status_byte())
    }

    /// Q1:Q2 as a big-endian 16-bit value
    pub fn word(&self) -> u16 {
        u16::from_be_bytes([self.params[0], self.params[1]])
    }

    pub fn q2(&self) -> u8 {
        self.params[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    #[test]
    fn test_response_from_frame() {
        let frame = Frame::new(Command::Count, 0x01, 0x2C, 0x00);
        let response = Response::from_frame(&frame);

        assert_eq!(response.word(), 300);
        assert_eq!(response.status(), AckStatus::Success);
        assert!(response.payload.is_none());
    }

    #[test]
    fn test_response_with_payload() {
        let frame = Frame::new(Command::QueryAllUsers, 0x00, 0x02, 0x00);
        let response = Response::with_payload(&frame, Bytes::from_static(&[0x00, 0x00]));

        assert_eq!(response.payload_len, Some(2));
        assert_eq!(response.payload.as_deref(), Some(&[0x00, 0x00][..]));
    }

    #[test]
    fn test_response_unknown_status_is_failure() {
        let frame = Frame::from_raw(0x04, [0, 0, 0x03]);
        assert_eq!(Response::from_frame(&frame).status(), AckStatus::Fail);
    }
}
