//! User table decoding
//!
//! The "query all users" payload is a big-endian record count followed by
//! that many 3-byte records:
//!
//! ```text
//! ┌──────────────┬────────┬────────┬────────────┬─────┐
//! │ count (u16)  │ id hi  │ id lo  │ permission │ ... │
//! └──────────────┴────────┴────────┴────────────┴─────┘
//! ```

use byteorder::{BigEndian, ByteOrder};
use raspy_core::{ProtocolViolation, constants::USER_RECORD_LEN};
use raspy_types::{Permission, UserId, UserRecord};

const COUNT_LEN: usize = 2;

/// Decode the user table
///
/// The payload must be exactly `2 + 3 * count` bytes and every record must
/// hold a non-zero id and a permission in 1..=3; otherwise nothing is
/// returned.
pub fn decode_users(payload: &[u8]) -> Result<Vec<UserRecord>, ProtocolViolation> {
    if payload.len() < COUNT_LEN {
        return Err(ProtocolViolation::RecordCount {
            max_id: 0,
            len: payload.len(),
        });
    }

    let max_id = BigEndian::read_u16(&payload[..COUNT_LEN]);
    if payload.len() != COUNT_LEN + USER_RECORD_LEN * usize::from(max_id) {
        return Err(ProtocolViolation::RecordCount {
            max_id,
            len: payload.len(),
        });
    }

    payload[COUNT_LEN..]
        .chunks_exact(USER_RECORD_LEN)
        .enumerate()
        .map(|(index, record)| decode_record(index, record))
        .collect()
}

/// Decode one `(id hi, id lo, permission)` record
pub(crate) fn decode_record(index: usize, record: &[u8]) -> Result<UserRecord, ProtocolViolation> {
    let invalid = |reason: String| ProtocolViolation::InvalidRecord { index, reason };

    if record.len() < USER_RECORD_LEN {
        return Err(invalid(format!("{} bytes", record.len())));
    }

    let id = UserId::new(BigEndian::read_u16(&record[..2])).map_err(|e| invalid(e.to_string()))?;
    let permission = Permission::try_from(record[2]).map_err(|e| invalid(e.to_string()))?;

    Ok(UserRecord::new(id, permission))
}
