//! Sensor command codes

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command codes
///
/// One code per sensor operation. Codes in the `0x41..=0x44` range carry a
/// data packet in the request; codes returning templates, images or the
/// user table answer with a length header followed by a data packet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    // Enrollment
    EnrollStep1 = 0x01,
    EnrollStep2 = 0x02,
    EnrollStep3 = 0x03,

    // User management
    DeleteUser = 0x04,
    DeleteUsers = 0x05,
    FetchEnrolledEigenvalues = 0x06,
    Count = 0x09,
    QueryPermission = 0x0A,

    // Comparison
    CompareOneToOne = 0x0B,
    CompareOneToMany = 0x0C,

    // Capture
    CaptureEigenvalues = 0x23,
    CaptureImage = 0x24,

    // Settings
    ComparisonLevel = 0x28,
    QueryAllUsers = 0x2B,
    Sleep = 0x2C,
    DuplicateMode = 0x2D,
    CaptureTimeout = 0x2E,

    // Template transfer
    UploadTemplate = 0x31,
    StoreTemplate = 0x41,
    VerifyTemplate = 0x42,
    IdentifyTemplate = 0x43,
    MatchTemplateLive = 0x44,
}

impl Command {
    /// Check if the reply is a length header followed by a data packet
    pub fn response_has_packet(self) -> bool {
        matches!(
            self,
            Self::FetchEnrolledEigenvalues
                | Self::CaptureEigenvalues
                | Self::CaptureImage
                | Self::QueryAllUsers
                | Self::UploadTemplate
        )
    }

    /// Check if the request is a length header followed by a data packet
    pub fn request_has_packet(self) -> bool {
        matches!(
            self,
            Self::StoreTemplate
                | Self::VerifyTemplate
                | Self::IdentifyTemplate
                | Self::MatchTemplateLive
        )
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::EnrollStep1 => "CMD_ADD_1",
            Self::EnrollStep2 => "CMD_ADD_2",
            Self::EnrollStep3 => "CMD_ADD_3",
            Self::DeleteUser => "CMD_DEL",
            Self::DeleteUsers => "CMD_DEL_ALL",
            Self::FetchEnrolledEigenvalues => "CMD_ADD_GET_EIGEN",
            Self::Count => "CMD_USER_CNT",
            Self::QueryPermission => "CMD_QUERY_PRIV",
            Self::CompareOneToOne => "CMD_MATCH_1_1",
            Self::CompareOneToMany => "CMD_MATCH_1_N",
            Self::CaptureEigenvalues => "CMD_GET_EIGEN",
            Self::CaptureImage => "CMD_GET_IMAGE",
            Self::ComparisonLevel => "CMD_COM_LEV",
            Self::QueryAllUsers => "CMD_USER_ALL",
            Self::Sleep => "CMD_SLEEP",
            Self::DuplicateMode => "CMD_DUP_MODE",
            Self::CaptureTimeout => "CMD_TIMEOUT",
            Self::UploadTemplate => "CMD_UPLOAD_EIGEN",
            Self::StoreTemplate => "CMD_DOWN_SAVE",
            Self::VerifyTemplate => "CMD_DOWN_MATCH_1_1",
            Self::IdentifyTemplate => "CMD_DOWN_MATCH_1_N",
            Self::MatchTemplateLive => "CMD_DOWN_MATCH_LIVE",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::EnrollStep1),
            0x02 => Ok(Self::EnrollStep2),
            0x03 => Ok(Self::EnrollStep3),
            0x04 => Ok(Self::DeleteUser),
            0x05 => Ok(Self::DeleteUsers),
            0x06 => Ok(Self::FetchEnrolledEigenvalues),
            0x09 => Ok(Self::Count),
            0x0A => Ok(Self::QueryPermission),
            0x0B => Ok(Self::CompareOneToOne),
            0x0C => Ok(Self::CompareOneToMany),
            0x23 => Ok(Self::CaptureEigenvalues),
            0x24 => Ok(Self::CaptureImage),
            0x28 => Ok(Self::ComparisonLevel),
            0x2B => Ok(Self::QueryAllUsers),
            0x2C => Ok(Self::Sleep),
            0x2D => Ok(Self::DuplicateMode),
            0x2E => Ok(Self::CaptureTimeout),
            0x31 => Ok(Self::UploadTemplate),
            0x41 => Ok(Self::StoreTemplate),
            0x42 => Ok(Self::VerifyTemplate),
            0x43 => Ok(Self::IdentifyTemplate),
            0x44 => Ok(Self::MatchTemplateLive),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}
