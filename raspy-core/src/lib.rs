//! # raspy-core
//!
//! Core protocol implementation for UART optical fingerprint modules.
//!
//! This crate provides the low-level protocol primitives:
//! - 8-byte frame encoding/decoding (commands, short replies, length headers)
//! - Data packet encoding/decoding for payloads larger than 3 bytes
//! - XOR checksum calculation
//! - Command codes and acknowledgement statuses
//! - Session bookkeeping

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod packet;
pub mod response;
pub mod session;
pub mod status;

pub use command::Command;
pub use error::{Error, FramingError, ProtocolViolation, Result};
pub use frame::{Frame, LengthHeader};
pub use packet::DataPacket;
pub use response::Response;
pub use session::{Session, SessionState, SessionStats};
pub use status::AckStatus;
