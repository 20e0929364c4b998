//! Section offset table and animation header of a MAB file

use derive_more::derive::Display;
use std::io::{Read, Seek};
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{CorruptDataError, Result};
use crate::version::FormatVersion;

/// Stored section offsets are relative to the end of the 16 byte file header
pub const SECTION_OFFSET_SKIP: i64 = 16;

/// Absolute offset of the animation length in seconds
pub const ANIMATION_LENGTH_START: u64 = 196;

/// Absolute offset of the section offset table
pub const SECTION_OFFSETS_START: u64 = 200;

/// A contiguous byte range inside a file
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[display("{offset:#x},{size}")]
pub struct Extent {
    pub offset: u32,
    pub size: u32,
}

impl Extent {
    /// Marker for optional sections missing from the file
    pub const ABSENT: Extent = Extent { offset: 0, size: 0 };

    /// Extent of `size` bytes starting at absolute `offset`
    pub fn new(offset: u32, size: u32) -> Self {
        Extent { offset, size }
    }

    /// Whether the section exists in the file at all
    pub fn is_present(&self) -> bool {
        *self != Extent::ABSENT
    }

    /// Whether the extent covers no bytes, present sections can still be empty
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Offset one past the last byte of this extent
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }
}

/// The sections of a MAB file
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SectionKind {
    #[display("Unknown Section 1")]
    Unknown1,
    #[display("Unknown Section 2")]
    Unknown2,
    #[display("Root Rotation")]
    Rotation,
    #[display("Rotation Keyframes")]
    Keyframes,
    #[display("Unknown Section 3")]
    Unknown3,
    #[display("Offset Animation")]
    Offsets,
    #[display("Events")]
    Events,
    #[display("Unknown Section 4")]
    Unknown4,
    #[display("Unknown Section 5")]
    Unknown5,
}

impl SectionKind {
    /// Order the offsets are stored in the table
    pub const STORED_ORDER: [SectionKind; 9] = [
        SectionKind::Unknown2,
        SectionKind::Unknown1,
        SectionKind::Rotation,
        SectionKind::Keyframes,
        SectionKind::Unknown3,
        SectionKind::Offsets,
        SectionKind::Events,
        SectionKind::Unknown4,
        SectionKind::Unknown5,
    ];

    /// Order the sections appear in the file
    pub const FILE_ORDER: [SectionKind; 9] = [
        SectionKind::Unknown1,
        SectionKind::Unknown2,
        SectionKind::Rotation,
        SectionKind::Keyframes,
        SectionKind::Unknown3,
        SectionKind::Offsets,
        SectionKind::Events,
        SectionKind::Unknown4,
        SectionKind::Unknown5,
    ];

    /// Optional sections are only present when their offset points past the offset table
    pub fn is_optional(self) -> bool {
        matches!(self, SectionKind::Events | SectionKind::Unknown4)
    }
}

/// Location and size of every section in a MAB file
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SectionTable {
    pub unknown1: Extent,
    pub unknown2: Extent,
    pub rotation: Extent,
    pub keyframes: Extent,
    pub unknown3: Extent,
    pub offsets: Extent,
    pub events: Extent,
    pub unknown4: Extent,
    pub unknown5: Extent,
}

impl SectionTable {
    pub fn get(&self, kind: SectionKind) -> Extent {
        match kind {
            SectionKind::Unknown1 => self.unknown1,
            SectionKind::Unknown2 => self.unknown2,
            SectionKind::Rotation => self.rotation,
            SectionKind::Keyframes => self.keyframes,
            SectionKind::Unknown3 => self.unknown3,
            SectionKind::Offsets => self.offsets,
            SectionKind::Events => self.events,
            SectionKind::Unknown4 => self.unknown4,
            SectionKind::Unknown5 => self.unknown5,
        }
    }

    fn get_mut(&mut self, kind: SectionKind) -> &mut Extent {
        match kind {
            SectionKind::Unknown1 => &mut self.unknown1,
            SectionKind::Unknown2 => &mut self.unknown2,
            SectionKind::Rotation => &mut self.rotation,
            SectionKind::Keyframes => &mut self.keyframes,
            SectionKind::Unknown3 => &mut self.unknown3,
            SectionKind::Offsets => &mut self.offsets,
            SectionKind::Events => &mut self.events,
            SectionKind::Unknown4 => &mut self.unknown4,
            SectionKind::Unknown5 => &mut self.unknown5,
        }
    }

    /// Iterate over all sections in file order
    pub fn iter(&self) -> impl Iterator<Item = (SectionKind, Extent)> + '_ {
        SectionKind::FILE_ORDER
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
    }

    /// Read the section offset table and derive the size of each section.
    ///
    /// Sizes are not stored, each one is the distance to the next present section in file
    /// order. The last section runs until the end of the source.
    #[instrument(skip(cursor), err)]
    pub fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<SectionTable> {
        cursor.seek_absolute(SECTION_OFFSETS_START)?;

        let mut offsets = [0i64; 9];
        for kind in SectionKind::STORED_ORDER {
            offsets[kind as usize] = cursor.read_i32()? as i64 + SECTION_OFFSET_SKIP;
        }

        let present: Vec<(SectionKind, i64)> = SectionKind::FILE_ORDER
            .into_iter()
            .map(|kind| (kind, offsets[kind as usize]))
            .filter(|&(kind, offset)| {
                !kind.is_optional() || offset > SECTION_OFFSETS_START as i64
            })
            .collect();

        let length = cursor.source_length() as i64;
        let mut table = SectionTable::default();
        for (i, &(kind, offset)) in present.iter().enumerate() {
            let end = present.get(i + 1).map_or(length, |&(_, next)| next);

            let corrupt = || CorruptDataError::SectionOrder {
                section: kind,
                offset,
            };
            if offset < 0 || end < offset {
                return Err(corrupt().into());
            }

            *table.get_mut(kind) = Extent {
                offset: u32::try_from(offset).map_err(|_| corrupt())?,
                size: u32::try_from(end - offset).map_err(|_| corrupt())?,
            };
        }

        for (kind, extent) in table.iter() {
            debug!("{kind} - {extent}");
        }

        Ok(table)
    }
}

/// Fixed header fields of a MAB file
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AnimationHeader {
    pub version: FormatVersion,
    /// Length of the animation in seconds
    pub length: f32,
}

impl AnimationHeader {
    #[instrument(skip(cursor), err)]
    pub fn read<R: Read + Seek>(
        cursor: &mut ByteCursor<R>,
        version: FormatVersion,
    ) -> Result<AnimationHeader> {
        cursor.seek_absolute(ANIMATION_LENGTH_START)?;
        let length = cursor.read_f32()?;
        debug!("animation length {length}s");

        Ok(AnimationHeader { version, length })
    }
}
