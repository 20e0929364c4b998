//! This library reads **MAB** animation containers used by Dunia engine games (*Far Cry 3* and
//! its siblings), along with the bone hierarchy of the model they animate.
//!
//! # MAB Format Documentation
//!
//! A MAB file is a fixed header, a table of section offsets and the sections themselves. All
//! multi-byte values are little-endian.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field            | Description                                               |
//! |----------------|------------------|-----------------------------------------------------------|
//! | 0x0000         | Version          | 1 byte: engine build, see [`FormatVersion`]               |
//! | 0x00C4         | Length           | 4 bytes: float, animation length in seconds               |
//! | 0x00C8         | Section offsets  | 9 * 4 bytes: signed offsets relative to byte 0x10         |
//!
//! ### Section Offsets
//!
//! Offsets are stored in this order:
//!
//! | Index | Section   |
//! |-------|-----------|
//! | 0     | Unknown2  |
//! | 1     | Unknown1  |
//! | 2     | Rotation  |
//! | 3     | Keyframes |
//! | 4     | Unknown3  |
//! | 5     | Offsets   |
//! | 6     | Events    |
//! | 7     | Unknown4  |
//! | 8     | Unknown5  |
//!
//! In the file itself `Unknown1` precedes `Unknown2`. `Events` and `Unknown4` are optional: they
//! are only present when their absolute offset lies past the offset table. Sizes are not stored,
//! a section runs until the next present section or the end of the file. See [`sections`].
//!
//! ### Rotation and Keyframes
//!
//! Rotations are stored as packed quaternions, three 16 bit words each. See [`quaternion`] for the
//! packing, [`rotation`] for the root bone track and [`keyframes`] for the per time bucket
//! keyframes.
//!
//! ## Model Files
//!
//! Bone names come from a separate model file, either a chunked mesh (`.xbg`) or a flat skeleton.
//! See [`bones`].
//!
//! ## Additional Information
//!
//! - **File Extension**: `.mab`
//! - **Endianness**: Little-endian for all multi-byte values
//! - **Supported Builds**: *Far Cry 3*
//!

pub mod bones;
pub mod cursor;
pub mod decode;
pub mod error;
pub mod keyframes;
pub mod quaternion;
pub mod rotation;
pub mod sections;
pub mod version;

pub use bones::{Bone, Bones, ModelFormat};
pub use decode::{DecodeOptions, DecodeResult, Decoder};
pub use quaternion::{Quaternion, QuaternionSample};
pub use sections::{Extent, SectionKind, SectionTable};
pub use version::FormatVersion;
