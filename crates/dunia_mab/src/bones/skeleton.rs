//! Flat skeleton files
//!
//! | Offset (bytes) | Field        | Description                            |
//! |----------------|--------------|----------------------------------------|
//! | 0x0000         | Magic number | 3 bytes: "SKL"                         |
//! | 0x0004         | Bone count   | 4 bytes                                |
//! | 0x0008         | Bones        | Bone list                              |
//!
//! Each bone is a length prefixed name followed by a 40 byte bind pose (rotation, position and
//! scale). Skeleton files carry no parent links.

use std::io::{Read, Seek};
use tracing::{debug, instrument, trace};

use crate::bones::{expect_signature, BoneHierarchyReader, Bones};
use crate::cursor::ByteCursor;
use crate::error::Result;

/// Skeleton magic number
pub const SIGNATURE: &[u8; 3] = b"SKL";

/// Absolute offset of the bone count
pub const BONE_COUNT_START: u64 = 4;

/// Absolute offset of the first bone
pub const BONES_START: u64 = 8;

/// Bytes following each bone name
pub const BIND_POSE_SIZE: i64 = 40;

/// Reads the bone names out of a skeleton file
#[derive(Debug, Default, Copy, Clone)]
pub struct SkeletonReader;

impl BoneHierarchyReader for SkeletonReader {
    #[instrument(skip_all, err)]
    fn read<R: Read + Seek>(&self, cursor: &mut ByteCursor<R>) -> Result<Bones> {
        cursor.seek_absolute(0)?;
        expect_signature(cursor, SIGNATURE, false)?;

        cursor.seek_absolute(BONE_COUNT_START)?;
        let count = cursor.read_u32()?;
        debug!("{count} bones");

        cursor.seek_absolute(BONES_START)?;
        let mut bones = Bones::new();
        for _ in 0..count {
            let len = cursor.read_u32()?;
            let name = cursor.read_fixed_ascii(len as usize)?;
            trace!("bone {name}");
            bones.push_root(name);

            cursor.seek_relative(BIND_POSE_SIZE)?;
        }

        Ok(bones)
    }
}
