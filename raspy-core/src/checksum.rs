//! XOR checksum
//!
//! Both frame kinds use the same checksum: every covered byte XORed together.
//! - 8-byte frame: covers bytes `0..6` (marker included)
//! - data packet: covers the payload only (markers excluded)

use tracing::trace;

/// Calculate the XOR checksum over `bytes`
///
/// # Examples
///
/// ```
/// use raspy_core::checksum;
///
/// assert_eq!(checksum::calculate(&[0xF5, 0x04, 0x00, 0x07, 0x00, 0x00]), 0xF6);
/// ```
pub fn calculate(bytes: &[u8]) -> u8 {
    let checksum = bytes.iter().fold(0u8, |acc, b| acc ^ b);

    trace!(
        len = bytes.len(),
        checksum = %format_args!("0x{:02X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Verify checksum
pub fn verify(bytes: &[u8], expected: u8) -> bool {
    calculate(bytes) == expected
}
