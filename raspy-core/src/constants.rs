//! Protocol constants

/// Start and end marker of every frame and data packet
pub const MARKER: u8 = 0xF5;

/// Size of a command, reply or length-header frame
pub const FRAME_LEN: usize = 8;

/// Offset of the checksum byte inside a frame
pub const FRAME_CHECKSUM_OFFSET: usize = 6;

/// Bytes a data packet adds around its payload (marker, checksum, marker)
pub const PACKET_OVERHEAD: usize = 3;

/// Length of an eigenvalue (template) payload
pub const EIGENVALUE_LEN: usize = 193;

/// Image geometry: 140x140 pixels, 4 bits per pixel
pub const IMAGE_WIDTH: usize = 140;
pub const IMAGE_HEIGHT: usize = 140;

/// Length of an image payload (two pixels per byte)
pub const IMAGE_LEN: usize = IMAGE_WIDTH * IMAGE_HEIGHT / 2;

/// Largest payload a length header can declare
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Size of one record in the "query all users" payload
pub const USER_RECORD_LEN: usize = 3;

/// P3 selector for the count command's "amount" branch. The sensor echoes
/// it back in Q3 instead of a status code.
pub const COUNT_AMOUNT_SELECTOR: u8 = 0xFF;
