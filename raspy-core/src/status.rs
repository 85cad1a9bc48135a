//! Acknowledgement status codes
//!
//! Q3 of most replies carries one of these codes. Values 2 and 3 are
//! reserved and never sent by the module.

use std::fmt;

use tracing::warn;

use crate::error::{Error, Result};

/// Outcome code reported by the sensor
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AckStatus {
    Success = 0x00,
    Fail = 0x01,
    DatabaseFull = 0x04,
    NoUser = 0x05,
    UserAlreadyExists = 0x06,
    FingerprintAlreadyExists = 0x07,
    Timeout = 0x08,
}

impl AckStatus {
    /// Classify a raw status byte
    ///
    /// Unknown codes collapse to [`AckStatus::Fail`]; they are never read as
    /// success.
    pub fn classify(code: u8) -> Self {
        match Self::try_from(code) {
            Ok(status) => status,
            Err(_) => {
                warn!("Unknown status code 0x{:02X}, treating as failure", code);
                Self::Fail
            }
        }
    }

    /// Check if this is a success status
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get status name
    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "ACK_SUCCESS",
            Self::Fail => "ACK_FAIL",
            Self::DatabaseFull => "ACK_FULL",
            Self::NoUser => "ACK_NOUSER",
            Self::UserAlreadyExists => "ACK_USER_OCCUPIED",
            Self::FingerprintAlreadyExists => "ACK_FINGER_OCCUPIED",
            Self::Timeout => "ACK_TIMEOUT",
        }
    }
}

impl From<AckStatus> for u8 {
    fn from(status: AckStatus) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for AckStatus {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Self::Success),
            0x01 => Ok(Self::Fail),
            0x04 => Ok(Self::DatabaseFull),
            0x05 => Ok(Self::NoUser),
            0x06 => Ok(Self::UserAlreadyExists),
            0x07 => Ok(Self::FingerprintAlreadyExists),
            0x08 => Ok(Self::Timeout),
            _ => Err(Error::UnknownStatus(value)),
        }
    }
}

impl fmt::Display for AckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_encoding() {
        assert_eq!(u8::from(AckStatus::Success), 0);
        assert_eq!(u8::from(AckStatus::DatabaseFull), 4);
        assert_eq!(u8::from(AckStatus::Timeout), 8);
        assert_eq!(AckStatus::try_from(6).unwrap(), AckStatus::UserAlreadyExists);
    }

    #[test]
    fn test_reserved_codes_rejected() {
        assert!(AckStatus::try_from(2).is_err());
        assert!(AckStatus::try_from(3).is_err());
    }

    #[test]
    fn test_classify_unknown_is_failure() {
        assert_eq!(AckStatus::classify(0x02), AckStatus::Fail);
        assert_eq!(AckStatus::classify(0xFF), AckStatus::Fail);
        assert_eq!(AckStatus::classify(0x05), AckStatus::NoUser);
    }

    #[test]
    fn test_is_success() {
        assert!(AckStatus::Success.is_success());
        assert!(!AckStatus::Timeout.is_success());
    }
}
