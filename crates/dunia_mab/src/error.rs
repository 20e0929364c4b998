//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

use crate::sections::SectionKind;
use crate::version::FormatVersion;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// A magic signature did not match the expected value
    #[error("invalid signature at {offset:#x}: expected {expected:?}, found {found:?}")]
    InvalidSignature {
        /// Offset of the signature in the file
        offset: u64,
        /// The signature we were looking for
        expected: String,
        /// The bytes that were actually present
        found: String,
    },

    /// A fixed length text field contained bytes outside of ASCII
    #[error("non-ascii text at {offset:#x}")]
    InvalidText {
        /// Offset of the text field in the file
        offset: u64,
    },

    /// The version byte is not one we know about
    #[error("unknown MAB format {0:#04x}")]
    UnknownFormat(u8),

    /// The version byte is known, but the layout of that build can not be decoded yet
    #[error("{0} MAB files are not yet supported")]
    UnsupportedVersion(FormatVersion),

    /// The file is structurally broken
    #[error(transparent)]
    CorruptData(#[from] CorruptDataError),

    /// A packed quaternion could not be parsed from text
    #[error("invalid packed quaternion {0:?}, expected 12 hex characters")]
    InvalidHex(String),
}

/// Error type to provide further information when the data itself is inconsistent
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum CorruptDataError {
    /// bone {bone} references parent {parent} but only {len} bones precede it
    #[error("bone {bone} references parent {parent} but only {len} bones precede it")]
    ParentOutOfRange {
        /// Index the bone would have been stored at
        bone: usize,
        /// The parent index stored in the file
        parent: i32,
        /// Number of bones read so far
        len: usize,
    },

    /// keyframe directory at {offset:#x} stopped at {reached} before reaching {target}
    #[error("keyframe directory at {offset:#x} stopped at {reached} before reaching {target}")]
    DirectoryNotConverging {
        /// Offset of the offending directory record
        offset: u64,
        /// Running boundary reached so far
        reached: i64,
        /// Payload size the walk must reach
        target: i32,
    },

    /// keyframe directory end {offset} lies before the start of the keyframe section
    #[error("keyframe directory end {offset} lies before the start of the keyframe section")]
    DirectoryEnd {
        /// Offset of the directory end, relative to the keyframe section
        offset: i64,
    },

    /// section {section} starts at {offset}, past the section that follows it
    #[error("section {section} starts at {offset}, past the section that follows it")]
    SectionOrder {
        /// The misplaced section
        section: SectionKind,
        /// The absolute offset computed for it
        offset: i64,
    },

    /// chunk at {offset:#x} declares size {size}, smaller than its own header
    #[error("chunk at {offset:#x} declares size {size}, smaller than its own header")]
    ChunkSize {
        /// Offset of the chunk header
        offset: u64,
        /// Declared chunk size
        size: u32,
    },

    /// negative element count {count} at {offset:#x}
    #[error("negative element count {count} at {offset:#x}")]
    NegativeCount {
        /// Offset of the count field
        offset: u64,
        /// The value that was read
        count: i32,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
