//! Rotation keyframe section
//!
//! | Offset (bytes) | Field      | Description                                               |
//! |----------------|------------|-----------------------------------------------------------|
//! | 0x0000         | Reserved   | 2 * 2 bytes                                               |
//! | 0x0004         | Scale      | 4 bytes: float, keyframe rate used to size the directory  |
//! | 0x0008         | Directory  | 4 bytes per boundary: offsets relative to the section     |
//!
//! The directory is a running list of boundaries, subsection `n` spans from boundary `n` to
//! boundary `n + 1`. Its length is not stored: the last boundary is the payload size and sits
//! right after [`last_offset`].
//!
//! Each subsection starts with a packed quaternion followed by a 2 byte mask. Every bit set in
//! the low byte of the mask adds one more packed quaternion after it.

use std::io::{Read, Seek};
use tracing::{debug, instrument, trace};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{CorruptDataError, Result};
use crate::quaternion::QuaternionSample;
use crate::sections::{AnimationHeader, Extent};

/// Offset of the first directory boundary inside the section
pub const DIRECTORY_START: u64 = 8;

/// One time bucket of rotation keyframes
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct KeyframeSubsection {
    /// Start of the subsection relative to the keyframe section
    pub start: i32,
    /// Size of the subsection in bytes
    pub size: i32,
    /// Decoded quaternions in file order
    pub samples: Vec<QuaternionSample>,
}

impl KeyframeSubsection {
    pub fn invalid_count(&self) -> usize {
        self.samples.iter().filter(|s| !s.is_valid()).count()
    }
}

/// Offset of the second to last directory boundary, relative to the keyframe section
pub fn last_offset(scale: f32, length: f32) -> i64 {
    let frames = (scale as f64 * length as f64).floor() as i64;
    ((frames >> 3) * 4) + 8
}

/// Walk the directory of boundaries until the payload size is reached.
///
/// Each boundary must lie past the previous one and the walk may not leave the section.
fn read_directory<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    extent: Extent,
    payload: i32,
) -> Result<Vec<KeyframeSubsection>> {
    cursor.seek_absolute(extent.offset as u64 + DIRECTORY_START)?;

    let mut subsections = Vec::new();
    let mut reached = 0i64;
    while reached < payload as i64 {
        let offset = cursor.position()?;
        let not_converging = CorruptDataError::DirectoryNotConverging {
            offset,
            reached,
            target: payload,
        };
        if offset + 8 > extent.end() {
            return Err(not_converging.into());
        }

        let start = cursor.read_i32()?;
        let end = cursor.read_i32()?;
        let size = end as i64 - start as i64;
        if start < 0 || size <= 0 {
            return Err(not_converging.into());
        }
        cursor.seek_relative(-4)?;

        trace!("subsection {start:#x}, {size}");
        subsections.push(KeyframeSubsection {
            start,
            size: size as i32,
            samples: Vec::new(),
        });
        reached = end as i64;
    }

    Ok(subsections)
}

/// Decode the quaternion run of a subsection
fn read_samples<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    extent: Extent,
    subsection: &mut KeyframeSubsection,
) -> Result<()> {
    cursor.seek_absolute(extent.offset as u64 + subsection.start as u64)?;
    subsection.samples.push(QuaternionSample::read(cursor)?);

    let mask = cursor.read_u16()?;
    let following = (mask & 0xFF).count_ones();
    trace!("{following} quaternions stored after {:#x}", subsection.start);

    for _ in 0..following {
        subsection.samples.push(QuaternionSample::read(cursor)?);
    }

    Ok(())
}

/// Read every subsection of the keyframe section and decode its quaternions.
///
/// Invalid quaternions are kept in place, only structural problems abort.
#[instrument(skip(cursor, header), err)]
pub fn read_keyframes<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    extent: Extent,
    header: &AnimationHeader,
) -> Result<Vec<KeyframeSubsection>> {
    if extent.is_empty() {
        return Ok(Vec::new());
    }

    let start = extent.offset as i64;
    cursor.seek_absolute(extent.offset as u64)?;
    cursor.seek_relative(4)?;
    let scale = cursor.read_f32()?;

    let last = last_offset(scale, header.length);
    let payload_at = u64::try_from(start + last + 4)
        .ok()
        .filter(|&at| at >= extent.offset as u64)
        .ok_or(CorruptDataError::DirectoryEnd { offset: last })?;
    cursor.seek_absolute(payload_at)?;
    let payload = cursor.read_i32()?;
    debug!(scale, last, payload, "keyframe directory");

    let mut subsections = read_directory(cursor, extent, payload)?;
    for subsection in subsections.iter_mut() {
        read_samples(cursor, extent, subsection)?;
    }
    debug!("{} keyframe subsections", subsections.len());

    Ok(subsections)
}
