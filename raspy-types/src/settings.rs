//! Sensor settings

use std::fmt;

use crate::error::{Error, Result};

/// Fingerprint comparison strictness (0..=9, higher is stricter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComparisonLevel(u8);

impl ComparisonLevel {
    pub const MAX: u8 = 9;

    /// Level the module ships with
    pub const DEFAULT: Self = Self(5);

    pub fn new(level: u8) -> Result<Self> {
        if level > Self::MAX {
            return Err(Error::Validation(format!(
                "comparison level must be 0..={}, got {}",
                Self::MAX,
                level
            )));
        }
        Ok(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for ComparisonLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for ComparisonLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for ComparisonLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fingerprint capture timeout in device ticks
///
/// One tick is roughly 0.2-0.3 s on the module. Zero means the module waits
/// for a finger indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureTimeout(u8);

impl CaptureTimeout {
    pub const UNBOUNDED: Self = Self(0);

    pub fn from_ticks(ticks: u8) -> Self {
        Self(ticks)
    }

    pub fn ticks(self) -> u8 {
        self.0
    }

    pub fn is_unbounded(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for CaptureTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            write!(f, "unbounded")
        } else {
            write!(f, "{} ticks", self.0)
        }
    }
}

/// Duplicate-detection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DuplicateMode {
    /// The same fingerprint may be enrolled under several users
    Allow = 0,

    /// Enrolling an already-stored fingerprint is refused
    Reject = 1,
}

impl TryFrom<u8> for DuplicateMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Allow),
            1 => Ok(Self::Reject),
            _ => Err(Error::Parse(format!("unknown duplicate mode {}", value))),
        }
    }
}

impl From<DuplicateMode> for u8 {
    fn from(mode: DuplicateMode) -> u8 {
        mode as u8
    }
}
