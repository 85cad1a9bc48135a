//! Tagged requests
//!
//! Every logical operation is its own variant. The variant alone decides the
//! command code, the parameter bytes, whether a data packet is uploaded and
//! what kind of reply follows.

use raspy_core::{
    Command, Frame, LengthHeader, Result,
    constants::{COUNT_AMOUNT_SELECTOR, EIGENVALUE_LEN, IMAGE_LEN},
};
use raspy_types::{CaptureTimeout, ComparisonLevel, DuplicateMode, Eigenvalues, Permission, UserId};

/// One of the three enrollment captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollStep {
    First,
    Second,
    Third,
}

impl EnrollStep {
    pub fn command(self) -> Command {
        match self {
            Self::First => Command::EnrollStep1,
            Self::Second => Command::EnrollStep2,
            Self::Third => Command::EnrollStep3,
        }
    }
}

/// What the count command counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountKind {
    /// Enrolled users
    Users,

    /// The module's fingerprint amount figure (P3 = 0xFF)
    Amount,
}

/// Query or change a sensor setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting<T> {
    Query,
    Set(T),
}

impl<T> Setting<T> {
    /// (P2, P3): the new value and 0 to set, 0 and 1 to query
    fn params(&self, value: impl Fn(&T) -> u8) -> (u8, u8) {
        match self {
            Self::Set(v) => (value(v), 0),
            Self::Query => (0, 1),
        }
    }
}

/// Payload that follows a length-header reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadLen {
    /// Exactly this many bytes; anything else is a protocol violation
    Fixed(usize),

    /// Whatever the header declares
    Variable,
}

/// A single sensor request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    Enroll {
        step: EnrollStep,
        user: UserId,
        permission: Permission,
    },
    DeleteUser(UserId),
    /// `None` deletes every user
    DeleteUsers(Option<Permission>),
    FetchEnrolledEigenvalues,
    Count(CountKind),
    QueryPermission(UserId),
    CompareOneToOne(UserId),
    CompareOneToMany,
    CaptureEigenvalues,
    CaptureImage,
    ComparisonLevel(Setting<ComparisonLevel>),
    QueryAllUsers,
    Sleep,
    DuplicateMode(Setting<DuplicateMode>),
    CaptureTimeout(Setting<CaptureTimeout>),
    UploadTemplate(UserId),
    StoreTemplate {
        user: UserId,
        permission: Permission,
        eigenvalues: &'a Eigenvalues,
    },
    VerifyTemplate {
        user: UserId,
        eigenvalues: &'a Eigenvalues,
    },
    IdentifyTemplate(&'a Eigenvalues),
    MatchTemplateLive(&'a Eigenvalues),
}

impl Request<'_> {
    pub fn command(&self) -> Command {
        match self {
            Self::Enroll { step, .. } => step.command(),
            Self::DeleteUser(_) => Command::DeleteUser,
            Self::DeleteUsers(_) => Command::DeleteUsers,
            Self::FetchEnrolledEigenvalues => Command::FetchEnrolledEigenvalues,
            Self::Count(_) => Command::Count,
            Self::QueryPermission(_) => Command::QueryPermission,
            Self::CompareOneToOne(_) => Command::CompareOneToOne,
            Self::CompareOneToMany => Command::CompareOneToMany,
            Self::CaptureEigenvalues => Command::CaptureEigenvalues,
            Self::CaptureImage => Command::CaptureImage,
            Self::ComparisonLevel(_) => Command::ComparisonLevel,
            Self::QueryAllUsers => Command::QueryAllUsers,
            Self::Sleep => Command::Sleep,
            Self::DuplicateMode(_) => Command::DuplicateMode,
            Self::CaptureTimeout(_) => Command::CaptureTimeout,
            Self::UploadTemplate(_) => Command::UploadTemplate,
            Self::StoreTemplate { .. } => Command::StoreTemplate,
            Self::VerifyTemplate { .. } => Command::VerifyTemplate,
            Self::IdentifyTemplate(_) => Command::IdentifyTemplate,
            Self::MatchTemplateLive(_) => Command::MatchTemplateLive,
        }
    }

    /// First frame on the wire: the command frame, or the length header
    /// when a data packet follows
    pub fn frame(&self) -> Result<Frame> {
        let command = self.command();

        if let Some(block) = self.upload() {
            return Ok(LengthHeader::request(command, block.as_bytes().len())?.to_frame());
        }

        let [p1, p2, p3] = self.params();
        Ok(Frame::new(command, p1, p2, p3))
    }

    fn params(&self) -> [u8; 3] {
        match self {
            Self::Enroll {
                user, permission, ..
            } => {
                let [hi, lo] = user.to_be_bytes();
                [hi, lo, permission.level()]
            }
            Self::DeleteUser(user)
            | Self::QueryPermission(user)
            | Self::CompareOneToOne(user)
            | Self::UploadTemplate(user) => {
                let [hi, lo] = user.to_be_bytes();
                [hi, lo, 0]
            }
            Self::DeleteUsers(filter) => [0, 0, filter.map_or(0, Permission::level)],
            Self::Count(CountKind::Users) => [0, 0, 0],
            Self::Count(CountKind::Amount) => [0, 0, COUNT_AMOUNT_SELECTOR],
            Self::ComparisonLevel(setting) => {
                let (p2, p3) = setting.params(|level| level.get());
                [0, p2, p3]
            }
            Self::DuplicateMode(setting) => {
                let (p2, p3) = setting.params(|mode| u8::from(*mode));
                [0, p2, p3]
            }
            Self::CaptureTimeout(setting) => {
                let (p2, p3) = setting.params(|timeout| timeout.ticks());
                [0, p2, p3]
            }
            _ => [0, 0, 0],
        }
    }

    /// Data packet uploaded after the header, with its addressing slot filled
    pub fn upload(&self) -> Option<Eigenvalues> {
        match self {
            Self::StoreTemplate {
                user,
                permission,
                eigenvalues,
            } => {
                let [hi, lo] = user.to_be_bytes();
                Some(eigenvalues.with_prefix([hi, lo, permission.level()]))
            }
            Self::VerifyTemplate { user, eigenvalues } => {
                let [hi, lo] = user.to_be_bytes();
                Some(eigenvalues.with_prefix([hi, lo, 0]))
            }
            Self::IdentifyTemplate(eigenvalues) | Self::MatchTemplateLive(eigenvalues) => {
                Some(eigenvalues.with_prefix([0, 0, 0]))
            }
            _ => None,
        }
    }

    /// Payload expected after a successful reply header
    pub fn reply_payload(&self) -> Option<PayloadLen> {
        match self {
            Self::FetchEnrolledEigenvalues
            | Self::CaptureEigenvalues
            | Self::UploadTemplate(_) => Some(PayloadLen::Fixed(EIGENVALUE_LEN)),
            Self::CaptureImage => Some(PayloadLen::Fixed(IMAGE_LEN)),
            Self::QueryAllUsers => Some(PayloadLen::Variable),
            _ => None,
        }
    }
}
