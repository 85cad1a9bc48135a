//! Data packet structure and encoding/decoding
//!
//! Payloads longer than the three parameter bytes of a frame travel in a
//! data packet announced by a [`LengthHeader`](crate::frame::LengthHeader).

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::warn;

use crate::{
    checksum,
    constants::{MARKER, MAX_PAYLOAD_LEN, PACKET_OVERHEAD},
    error::{Error, FramingError, Result},
};

/// Variable-length data packet
///
/// # Packet Structure
///
/// ```text
/// ┌──────┬─────────────────┬──────────────┬──────┐
/// │ 0xF5 │     Payload     │   Checksum   │ 0xF5 │
/// │      │     N bytes     │ XOR(payload) │      │
/// └──────┴─────────────────┴──────────────┴──────┘
/// ```
///
/// Unlike a frame, the checksum covers the payload only.
///
/// # Examples
///
/// ```
/// use raspy_core::DataPacket;
///
/// let packet = DataPacket::new(vec![0x00, 0x05, 0x01]);
/// let encoded = packet.encode();
/// assert_eq!(&encoded[..], &[0xF5, 0x00, 0x05, 0x01, 0x04, 0xF5]);
///
/// let decoded = DataPacket::decode(&encoded).unwrap();
/// assert_eq!(decoded.payload, packet.payload);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct DataPacket {
    pub payload: Bytes,
}

impl DataPacket {
    /// Marker, checksum and marker around the payload
    pub const OVERHEAD: usize = PACKET_OVERHEAD;

    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Size on the wire for a payload of `payload_len` bytes
    pub fn wire_len(payload_len: usize) -> usize {
        payload_len + Self::OVERHEAD
    }

    /// Encode packet to bytes
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(Self::wire_len(self.payload.len()));

        buf.put_u8(MARKER);
        buf.put_slice(&self.payload);
        buf.put_u8(checksum::calculate(&self.payload));
        buf.put_u8(MARKER);

        buf
    }

    /// Decode packet from bytes, rejecting any envelope defect
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let (packet, defect) = Self::decode_lenient(buf)?;

        match defect {
            Some(defect) => Err(Error::Framing(defect)),
            None => Ok(packet),
        }
    }

    /// Decode packet from bytes, reporting envelope defects instead of failing
    ///
    /// `buf` must hold the whole packet; its length determines the payload
    /// length.
    pub fn decode_lenient(buf: &[u8]) -> Result<(Self, Option<FramingError>)> {
        if buf.len() < Self::OVERHEAD {
            return Err(Error::FrameSize {
                expected: Self::OVERHEAD,
                actual: buf.len(),
            });
        }
        if buf.len() > Self::wire_len(MAX_PAYLOAD_LEN) {
            return Err(Error::PayloadTooLarge {
                size: buf.len() - Self::OVERHEAD,
                max: MAX_PAYLOAD_LEN,
            });
        }

        let last = buf.len() - 1;
        let payload = &buf[1..last - 1];
        let received = buf[last - 1];
        let expected = checksum::calculate(payload);

        let defect = if buf[0] != MARKER {
            Some(FramingError::BadMarker {
                offset: 0,
                found: buf[0],
            })
        } else if buf[last] != MARKER {
            Some(FramingError::BadMarker {
                offset: last,
                found: buf[last],
            })
        } else if received != expected {
            Some(FramingError::ChecksumMismatch { expected, received })
        } else {
            None
        };

        if let Some(defect) = defect {
            warn!(len = payload.len(), "Malformed data packet: {}", defect);
        }

        Ok((Self::new(Bytes::copy_from_slice(payload)), defect))
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl fmt::Debug for DataPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataPacket")
            .field("payload_len", &self.payload.len())
            .field("checksum", &format!("0x{:02X}", checksum::calculate(&self.payload)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_packet_encode_decode() {
        let payload = vec![0xAB; 193];
        let encoded = DataPacket::new(payload.clone()).encode();

        assert_eq!(encoded.len(), 196);
        assert_eq!(encoded[0], MARKER);
        assert_eq!(encoded[195], MARKER);

        let decoded = DataPacket::decode(&encoded).unwrap();
        assert_eq!(decoded.payload.as_ref(), payload.as_slice());
    }

    #[test]
    fn test_packet_checksum_excludes_markers() {
        let encoded = DataPacket::new(vec![0x01, 0x02]).encode();
        assert_eq!(&encoded[..], &[0xF5, 0x01, 0x02, 0x03, 0xF5]);
    }

    #[test]
    fn test_packet_empty_payload() {
        let decoded = DataPacket::decode(&[0xF5, 0x00, 0xF5]).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_packet_too_short() {
        let result = DataPacket::decode(&[0xF5, 0xF5]);
        assert!(matches!(result, Err(Error::FrameSize { .. })));
    }

    #[test]
    fn test_packet_checksum_defect_keeps_payload() {
        let mut encoded = DataPacket::new(vec![1, 2, 3, 4]).encode();
        encoded[5] ^= 0x10;

        let (packet, defect) = DataPacket::decode_lenient(&encoded).unwrap();
        assert_eq!(packet.payload.as_ref(), &[1, 2, 3, 4]);
        assert_eq!(
            defect,
            Some(FramingError::ChecksumMismatch {
                expected: 0x04,
                received: 0x14
            })
        );
    }

    #[test]
    fn test_packet_bad_start_marker() {
        let mut encoded = DataPacket::new(vec![9]).encode();
        encoded[0] = 0xF4;

        assert!(matches!(
            DataPacket::decode(&encoded),
            Err(Error::Framing(FramingError::BadMarker { offset: 0, found: 0xF4 }))
        ));
    }
}
