//! Frame and data packet I/O over the transport
//!
//! A request is one frame (or a length header plus a data packet); its reply
//! is one frame, optionally followed by a data packet of the length the
//! reply header declares.

use bytes::Bytes;
use tracing::{debug, trace, warn};

use raspy_core::{
    AckStatus, DataPacket, Frame, FramingError, LengthHeader, ProtocolViolation, Response,
    Session,
};
use raspy_transport::Transport;

use crate::error::{Error, Result};
use crate::request::{PayloadLen, Request};

/// Owns the transport for one session
pub(crate) struct Link {
    transport: Box<dyn Transport>,
    session: Session,
}

impl Link {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn peer(&self) -> String {
        self.transport.peer()
    }

    /// Send a request and collect its complete reply
    pub async fn exchange(&mut self, request: &Request<'_>) -> Result<Response> {
        if !self.session.is_open() {
            return Err(Error::Closed);
        }

        let command = request.command();
        self.write_frame(&request.frame()?).await?;

        if let Some(block) = request.upload() {
            self.write_packet(block.as_bytes()).await?;
        }

        let reply = self.read_frame(command.into()).await?;

        let Some(expected) = request.reply_payload() else {
            return Ok(Response::from_frame(&reply));
        };

        let header = LengthHeader::from_frame(&reply);
        if !AckStatus::classify(header.status).is_success() {
            // No data packet follows a refusal
            return Ok(Response::from_frame(&reply));
        }

        let len = header.payload_len();
        if let PayloadLen::Fixed(expected) = expected {
            if len != expected {
                warn!(
                    "{} declared {} payload bytes, expected {}",
                    command, len, expected
                );
                self.discard_packet(len).await?;
                return Err(ProtocolViolation::PayloadLength {
                    expected,
                    actual: len,
                }
                .into());
            }
        }

        let payload = self.read_packet(len).await?;
        Ok(Response::with_payload(&reply, payload))
    }

    async fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let encoded = frame.encode();
        trace!("TX frame {}", hex::encode(encoded));

        self.transport.send(&encoded).await?;
        self.session.record_sent();

        Ok(())
    }

    async fn read_frame(&mut self, sent: u8) -> Result<Frame> {
        let mut buf = [0u8; Frame::LEN];
        self.transport.receive_exact(&mut buf).await?;
        self.session.record_received();

        trace!("RX frame {}", hex::encode(buf));

        let (frame, defect) = Frame::decode_lenient(&buf)?;

        let defect = defect.or_else(|| {
            (frame.command != sent).then_some(FramingError::CommandMismatch {
                sent,
                received: frame.command,
            })
        });

        if let Some(defect) = defect {
            // Proceed anyway: the status byte decides the outcome
            if matches!(defect, FramingError::CommandMismatch { .. }) {
                warn!("Unexpected reply: {}", defect);
            }
            self.session.record_framing_fault();
        }

        Ok(frame)
    }

    async fn write_packet(&mut self, payload: &[u8]) -> Result<()> {
        let encoded = DataPacket::new(Bytes::copy_from_slice(payload)).encode();
        trace!("TX packet of {} bytes", payload.len());

        self.transport.send(&encoded).await?;
        self.session.record_sent();

        Ok(())
    }

    async fn read_packet(&mut self, len: usize) -> Result<Bytes> {
        let mut buf = vec![0u8; DataPacket::wire_len(len)];
        self.transport.receive_exact(&mut buf).await?;
        self.session.record_received();

        trace!("RX packet of {} bytes", len);

        let (packet, defect) = DataPacket::decode_lenient(&buf)?;
        if defect.is_some() {
            self.session.record_framing_fault();
        }

        Ok(packet.payload)
    }

    /// Read and drop a data packet so the line stays aligned
    async fn discard_packet(&mut self, len: usize) -> Result<()> {
        let mut buf = vec![0u8; DataPacket::wire_len(len)];
        self.transport.receive_exact(&mut buf).await?;
        self.session.record_received();

        debug!("Discarded packet of {} bytes", len);
        Ok(())
    }

    /// Close the session and the transport, exactly once
    pub async fn close(&mut self) -> Result<()> {
        self.session.close()?;
        self.transport.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use pretty_assertions::assert_eq;
    use raspy_core::Command;
    use raspy_types::UserId;

    #[tokio::test]
    async fn test_exchange_short_reply() {
        let transport = ScriptedTransport::new();
        transport.reply_frame(0x0A, [0, 0, 2]);

        let mut link = Link::new(Box::new(transport.clone()));
        let request = Request::QueryPermission(UserId::new(3).unwrap());
        let response = link.exchange(&request).await.unwrap();

        assert_eq!(response.params, [0, 0, 2]);
        assert_eq!(response.payload, None);
        assert_eq!(
            transport.sent(),
            vec![Frame::new(Command::QueryPermission, 0, 3, 0).encode().to_vec()]
        );
    }

    #[tokio::test]
    async fn test_exchange_reads_declared_packet() {
        let transport = ScriptedTransport::new();
        let payload = [0x00, 0x01, 0x00, 0x05, 0x01];
        transport.reply_packet(0x2B, &payload);

        let mut link = Link::new(Box::new(transport.clone()));
        let response = link.exchange(&Request::QueryAllUsers).await.unwrap();

        assert_eq!(response.payload.as_deref(), Some(&payload[..]));
        assert_eq!(response.payload_len, Some(5));
        assert_eq!(transport.reads(), 2);
    }

    #[tokio::test]
    async fn test_refusal_has_no_packet() {
        let transport = ScriptedTransport::new();
        transport.reply_frame(0x24, [0, 0, 0x08]);

        let mut link = Link::new(Box::new(transport.clone()));
        let response = link.exchange(&Request::CaptureImage).await.unwrap();

        assert_eq!(response.status(), AckStatus::Timeout);
        assert_eq!(response.payload, None);
        assert_eq!(transport.reads(), 1);
    }

    #[tokio::test]
    async fn test_wrong_fixed_length_is_drained_and_rejected() {
        let transport = ScriptedTransport::new();
        transport.reply_packet(0x23, &[0x11; 190]);

        let mut link = Link::new(Box::new(transport.clone()));
        let err = link.exchange(&Request::CaptureEigenvalues).await.unwrap_err();

        assert!(err.is_protocol_violation());
        assert_eq!(transport.pending(), 0);
    }

    #[tokio::test]
    async fn test_framing_defect_is_tolerated() {
        let transport = ScriptedTransport::new();
        let mut reply = Frame::from_raw(0x04, [0, 0, 0]).encode();
        reply[6] ^= 0x55;
        transport.reply(&reply);

        let mut link = Link::new(Box::new(transport.clone()));
        let response = link
            .exchange(&Request::DeleteUser(UserId::new(7).unwrap()))
            .await
            .unwrap();

        assert_eq!(response.status(), AckStatus::Success);
        assert_eq!(link.session().stats().framing_faults, 1);
    }

    #[tokio::test]
    async fn test_command_echo_mismatch_is_tolerated() {
        let transport = ScriptedTransport::new();
        transport.reply_frame(0x05, [0, 0, 0]);

        let mut link = Link::new(Box::new(transport.clone()));
        let response = link
            .exchange(&Request::DeleteUser(UserId::new(7).unwrap()))
            .await
            .unwrap();

        assert_eq!(response.status(), AckStatus::Success);
        assert_eq!(link.session().stats().framing_faults, 1);
        assert_eq!(transport.reads(), 1);
    }

    #[tokio::test]
    async fn test_packet_checksum_defect_is_tolerated() {
        let transport = ScriptedTransport::new();
        transport.reply_frame(0x2B, [0x00, 0x02, 0x00]);
        transport.reply(&[0xF5, 0x00, 0x00, 0x77, 0xF5]);

        let mut link = Link::new(Box::new(transport.clone()));
        let response = link.exchange(&Request::QueryAllUsers).await.unwrap();

        assert_eq!(response.payload.as_deref(), Some(&[0x00, 0x00][..]));
        assert_eq!(link.session().stats().framing_faults, 1);
    }

    #[tokio::test]
    async fn test_partial_read_is_transport_error() {
        let transport = ScriptedTransport::new();
        transport.reply(&[0xF5, 0x04, 0x00]);

        let mut link = Link::new(Box::new(transport.clone()));
        let err = link
            .exchange(&Request::DeleteUser(UserId::new(7).unwrap()))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(!err.is_protocol_violation());
    }

    #[tokio::test]
    async fn test_close_once() {
        let transport = ScriptedTransport::new();
        let mut link = Link::new(Box::new(transport.clone()));

        link.close().await.unwrap();
        assert!(transport.is_closed());
        assert!(link.close().await.is_err());
        assert!(matches!(
            link.exchange(&Request::Sleep).await,
            Err(Error::Closed)
        ));
    }

    mockall::mock! {
        Line {}

        #[async_trait::async_trait]
        impl Transport for Line {
            async fn send(&mut self, data: &[u8]) -> raspy_transport::Result<usize>;
            async fn receive_exact(&mut self, buf: &mut [u8]) -> raspy_transport::Result<usize>;
            async fn close(&mut self) -> raspy_transport::Result<()>;
            fn is_open(&self) -> bool;
            fn peer(&self) -> String;
        }
    }

    #[tokio::test]
    async fn test_failed_send_skips_reply() {
        let mut line = MockLine::new();
        line.expect_send()
            .times(1)
            .returning(|_| Err(raspy_transport::Error::ConnectionClosed));
        line.expect_receive_exact().never();

        let mut link = Link::new(Box::new(line));
        let err = link.exchange(&Request::Sleep).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(link.session().stats().sent, 0);
    }

    #[tokio::test]
    async fn test_reply_read_in_one_call() {
        let reply = Frame::from_raw(0x2C, [0, 0, 0]).encode();

        let mut line = MockLine::new();
        line.expect_send().times(1).returning(|data| Ok(data.len()));
        line.expect_receive_exact()
            .times(1)
            .returning(move |buf| {
                buf.copy_from_slice(&reply);
                Ok(buf.len())
            });

        let mut link = Link::new(Box::new(line));
        let response = link.exchange(&Request::Sleep).await.unwrap();

        assert_eq!(response.status(), AckStatus::Success);
        assert_eq!(link.session().stats().framing_faults, 0);
    }

    #[tokio::test]
    async fn test_close_failure_still_closes_session() {
        let mut line = MockLine::new();
        line.expect_close().times(1).returning(|| {
            Err(raspy_transport::Error::Io(std::io::Error::other("reset")))
        });

        let mut link = Link::new(Box::new(line));

        assert!(link.close().await.unwrap_err().is_transport());
        assert!(!link.session().is_open());
        assert!(link.close().await.is_err());
    }
}
