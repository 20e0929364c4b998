//! Chunked mesh files (`.xbg`)
//!
//! | Offset (bytes) | Field         | Description                                       |
//! |----------------|---------------|---------------------------------------------------|
//! | 0x0000         | Magic number  | 4 bytes: "HSEM", "MESH" stored back to front      |
//! | 0x0004         | Major version | 2 bytes                                           |
//! | 0x0006         | Minor version | 2 bytes                                           |
//! | 0x001C         | Chunk count   | 4 bytes: number of top level chunks               |
//! | 0x0020         | Chunks        | Chunk list                                        |
//!
//! Every chunk starts with a 20 byte header, its tag is also stored back to front:
//!
//! | Offset (bytes) | Field   | Description                                      |
//! |----------------|---------|--------------------------------------------------|
//! | 0x0000         | Tag     | 4 bytes                                          |
//! | 0x0004         | Unknown | 4 bytes                                          |
//! | 0x0008         | Size    | 4 bytes: size of the chunk including this header |
//! | 0x000C         | Unknown | 8 bytes                                          |
//!
//! The `NODE` chunk holds a bone count followed by one record per bone. Each record holds
//! 12 unknown bytes, the parent index, a transform block whose size depends on the major
//! version, 12 more unknown bytes, a length prefixed name and 1 trailing byte (5 for the
//! extended layout).

use binrw::BinRead;
use std::io::{Read, Seek};
use tracing::{debug, instrument, trace};

use crate::bones::{expect_signature, BoneHierarchyReader, Bones};
use crate::cursor::ByteCursor;
use crate::error::{CorruptDataError, Result};

/// Mesh magic number, stored back to front
pub const SIGNATURE: &[u8; 4] = b"MESH";

/// Absolute offset of the chunk count
pub const CHUNK_COUNT_START: u64 = 28;

/// Tag of the chunk holding the bone hierarchy
pub const NODE_TAG: &str = "NODE";

/// Major version using the extended bone record
pub const EXTENDED_NODE_VERSION: u16 = 46;

const CHUNK_HEADER_SIZE: u32 = 20;

#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
struct ChunkHeader {
    tag: [u8; 4],
    _unknown: u32,
    size: u32,
    _reserved: u64,
}

impl ChunkHeader {
    fn tag(&self) -> String {
        self.tag.iter().rev().map(|&b| char::from(b)).collect()
    }
}

/// Reads the bone hierarchy out of a mesh file
#[derive(Debug, Default, Copy, Clone)]
pub struct MeshReader;

impl MeshReader {
    fn read_nodes<R: Read + Seek>(cursor: &mut ByteCursor<R>, major: u16) -> Result<Bones> {
        let extended = major == EXTENDED_NODE_VERSION;
        let count = cursor.read_u32()?;
        debug!("{count} bones");

        let mut bones = Bones::new();
        for _ in 0..count {
            cursor.seek_relative(12)?;
            let parent = cursor.read_i32()?;

            cursor.seek_relative(if extended { 48 } else { 40 })?;
            cursor.seek_relative(12)?;

            let len = cursor.read_u32()?;
            let name = cursor.read_fixed_ascii(len as usize)?;
            trace!(parent, "bone {name}");
            bones.push_with_parent(name, parent)?;

            cursor.seek_relative(1)?;
            if extended {
                cursor.seek_relative(4)?;
            }
        }

        Ok(bones)
    }
}

impl BoneHierarchyReader for MeshReader {
    /// Walk the chunk list until the `NODE` chunk and read its bones.
    ///
    /// A mesh without a `NODE` chunk has no bones.
    #[instrument(skip_all, err)]
    fn read<R: Read + Seek>(&self, cursor: &mut ByteCursor<R>) -> Result<Bones> {
        cursor.seek_absolute(0)?;
        expect_signature(cursor, SIGNATURE, true)?;
        let major = cursor.read_u16()?;
        let minor = cursor.read_u16()?;
        debug!("mesh version {major}.{minor}");

        cursor.seek_absolute(CHUNK_COUNT_START)?;
        let chunks = cursor.read_u32()?;

        for _ in 0..chunks {
            let offset = cursor.position()?;
            let header: ChunkHeader = cursor.read_le()?;
            let tag = header.tag();
            trace!(size = header.size, "chunk {tag} at {offset:#x}");

            if tag == NODE_TAG {
                return Self::read_nodes(cursor, major);
            }

            let remaining = header
                .size
                .checked_sub(CHUNK_HEADER_SIZE)
                .ok_or(CorruptDataError::ChunkSize {
                    offset,
                    size: header.size,
                })?;
            cursor.seek_relative(remaining as i64)?;
        }

        debug!("no {NODE_TAG} chunk in {chunks} chunks");
        Ok(Bones::new())
    }
}
