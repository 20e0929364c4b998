//! Root bone rotation track
//!
//! | Offset (bytes) | Field     | Description                              |
//! |----------------|-----------|------------------------------------------|
//! | 0x0000         | Count     | 4 bytes: number of rotations             |
//! | 0x0004         | Unknown   | 4 bytes                                  |
//! | 0x0008         | Rotations | Count * 6 bytes: packed quaternions      |

use std::io::{Read, Seek};
use tracing::{debug, instrument};

use crate::cursor::ByteCursor;
use crate::error::{CorruptDataError, Result};
use crate::quaternion::QuaternionSample;
use crate::sections::Extent;

/// Read every root rotation in the rotation section, keeping invalid ones in place
#[instrument(skip(cursor), err)]
pub fn read_root_rotations<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    extent: Extent,
) -> Result<Vec<QuaternionSample>> {
    if extent.is_empty() {
        return Ok(Vec::new());
    }

    cursor.seek_absolute(extent.offset as u64)?;
    let count = cursor.read_i32()?;
    let count = usize::try_from(count).map_err(|_| CorruptDataError::NegativeCount {
        offset: extent.offset as u64,
        count,
    })?;
    cursor.seek_relative(4)?;
    debug!("{count} root rotations");

    (0..count)
        .map(|_| QuaternionSample::read(cursor))
        .collect()
}
