//! User identifiers, permissions and records

use std::fmt;

use crate::error::{Error, Result};
use crate::template::Eigenvalues;

/// User identifier (1..=0xFFFF)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(u16);

impl UserId {
    /// Create a user id, rejecting 0
    pub fn new(id: u16) -> Result<Self> {
        if id == 0 {
            return Err(Error::Validation("user id must be non-zero".into()));
        }
        Ok(Self(id))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// High and low byte, as sent in P1/P2
    pub fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl TryFrom<u16> for UserId {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<UserId> for u16 {
    fn from(id: UserId) -> u16 {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User permission level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Permission {
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
}

impl Permission {
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Permission {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Level1),
            2 => Ok(Self::Level2),
            3 => Ok(Self::Level3),
            _ => Err(Error::Validation(format!(
                "permission must be 1, 2 or 3, got {}",
                value
            ))),
        }
    }
}

impl From<Permission> for u8 {
    fn from(permission: Permission) -> u8 {
        permission as u8
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// User stored on the sensor
///
/// Built from decoded payload bytes; never tied to a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub permission: Permission,

    /// Present only when the template was uploaded along with the record
    pub eigenvalues: Option<Eigenvalues>,
}

impl UserRecord {
    pub fn new(id: UserId, permission: Permission) -> Self {
        Self {
            id,
            permission,
            eigenvalues: None,
        }
    }

    pub fn with_eigenvalues(mut self, eigenvalues: Eigenvalues) -> Self {
        self.eigenvalues = Some(eigenvalues);
        self
    }
}

impl fmt::Display for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User[id: {}, permission: {}]", self.id, self.permission)
    }
}

/// Outcome of a 1:N comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identification {
    /// The print matched a stored user
    Match {
        user: UserId,
        permission: Permission,
    },

    /// No stored user matched
    NoMatch,
}

impl Identification {
    pub fn user(&self) -> Option<UserId> {
        match self {
            Self::Match { user, .. } => Some(*user),
            Self::NoMatch => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_rejects_zero() {
        assert!(UserId::new(0).is_err());
        assert_eq!(UserId::new(0x1234).unwrap().to_be_bytes(), [0x12, 0x34]);
        assert_eq!(UserId::try_from(0xFFFF).unwrap().get(), 0xFFFF);
    }

    #[test]
    fn test_permission_range() {
        assert_eq!(Permission::try_from(2).unwrap(), Permission::Level2);
        assert!(Permission::try_from(0).is_err());
        assert!(Permission::try_from(4).is_err());
        assert_eq!(u8::from(Permission::Level3), 3);
    }

    #[test]
    fn test_identification_user() {
        let user = UserId::new(7).unwrap();
        let matched = Identification::Match {
            user,
            permission: Permission::Level1,
        };

        assert_eq!(matched.user(), Some(user));
        assert_eq!(Identification::NoMatch.user(), None);
    }

    #[test]
    fn test_record_display() {
        let record = UserRecord::new(UserId::new(5).unwrap(), Permission::Level1);
        assert_eq!(record.to_string(), "User[id: 5, permission: 1]");
    }
}
