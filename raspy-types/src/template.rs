//! Fingerprint eigenvalues (biometric template)

use std::fmt;

use crate::error::{Error, Result};

// Same as `raspy_core::constants::EIGENVALUE_LEN`
const BLOCK_LEN: usize = 193;

/// Fixed-size eigenvalue block as it travels in a data packet
///
/// The first three bytes are an addressing slot: user id (high, low) and
/// permission when the block belongs to a stored user, zeros otherwise.
/// The remaining bytes are the opaque template body.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Eigenvalues([u8; BLOCK_LEN]);

impl Eigenvalues {
    /// Block length on the wire
    pub const LEN: usize = BLOCK_LEN;

    /// Length of the addressing slot
    pub const PREFIX_LEN: usize = 3;

    /// Length of the template body
    pub const BODY_LEN: usize = Self::LEN - Self::PREFIX_LEN;

    /// Copy a block out of a payload
    ///
    /// Anything other than exactly 193 bytes is rejected, never truncated
    /// or padded.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let block: [u8; BLOCK_LEN] = bytes.try_into().map_err(|_| {
            Error::Parse(format!(
                "eigenvalues must be {} bytes, got {}",
                Self::LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(block))
    }

    /// Addressing slot (user id + permission, or padding)
    pub fn prefix(&self) -> [u8; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Template body
    pub fn body(&self) -> &[u8] {
        &self.0[Self::PREFIX_LEN..]
    }

    /// Copy of this block with the addressing slot replaced
    pub fn with_prefix(&self, prefix: [u8; 3]) -> Self {
        let mut block = self.0;
        block[..Self::PREFIX_LEN].copy_from_slice(&prefix);
        Self(block)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Eigenvalues {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Eigenvalues {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl fmt::Debug for Eigenvalues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Eigenvalues")
            .field("prefix", &format!("{:02X?}", self.prefix()))
            .field("body_len", &Self::BODY_LEN)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Eigenvalues {
        let bytes: Vec<u8> = (0..Eigenvalues::LEN).map(|i| i as u8).collect();
        Eigenvalues::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_eigenvalues_exact_length() {
        assert!(Eigenvalues::from_slice(&[0u8; 192]).is_err());
        assert!(Eigenvalues::from_slice(&[0u8; 194]).is_err());
        assert!(Eigenvalues::from_slice(&[0u8; 193]).is_ok());
    }

    #[test]
    fn test_eigenvalues_layout() {
        let eigenvalues = sample();

        assert_eq!(eigenvalues.prefix(), [0, 1, 2]);
        assert_eq!(eigenvalues.body().len(), 190);
        assert_eq!(eigenvalues.body()[0], 3);
    }

    #[test]
    fn test_eigenvalues_with_prefix() {
        let original = sample();
        let addressed = original.with_prefix([0x00, 0x07, 0x02]);

        assert_eq!(addressed.prefix(), [0x00, 0x07, 0x02]);
        assert_eq!(addressed.body(), original.body());
    }
}
