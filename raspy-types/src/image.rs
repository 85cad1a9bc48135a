//! Captured fingerprint image

use std::fmt;

use crate::error::{Error, Result};

// Same as `raspy_core::constants::IMAGE_LEN`
const PACKED_LEN: usize = 140 * 140 / 2;

/// 140x140 image, 4 bits per pixel, two pixels per byte
///
/// The high nibble of each byte is the left pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct Image(Box<[u8; PACKED_LEN]>);

impl Image {
    pub const WIDTH: usize = 140;
    pub const HEIGHT: usize = 140;

    /// Packed size in bytes
    pub const LEN: usize = PACKED_LEN;

    /// Copy an image out of a payload; anything but 9800 bytes is rejected
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::LEN {
            return Err(Error::Parse(format!(
                "image must be {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }

        let mut buf = Box::new([0u8; PACKED_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// 4-bit gray value at (`x`, `y`), `None` outside the image
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= Self::WIDTH || y >= Self::HEIGHT {
            return None;
        }

        let index = y * Self::WIDTH + x;
        let byte = self.0[index / 2];
        Some(if index % 2 == 0 { byte >> 4 } else { byte & 0x0F })
    }

    /// Expand to one 8-bit gray value per pixel, row-major
    pub fn to_gray8(&self) -> Vec<u8> {
        self.0
            .iter()
            .flat_map(|byte| [(byte >> 4) * 17, (byte & 0x0F) * 17])
            .collect()
    }

    /// Packed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image[{}x{}, 4bpp]", Self::WIDTH, Self::HEIGHT)
    }
}
