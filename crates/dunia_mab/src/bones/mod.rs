//! Bone hierarchies read from model files
//!
//! Bones come from one of two model layouts, told apart by their signature:
//!
//! | Signature        | Layout     | Parent links |
//! |------------------|------------|--------------|
//! | `HSEM` ("MESH")  | [`mesh`]   | yes          |
//! | `SKL`            | [`skeleton`] | no         |

pub mod mesh;
pub mod skeleton;

use derive_more::derive::{Deref, Display, IntoIterator};
use std::io::{Read, Seek};
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{CorruptDataError, Error, Result};

pub use mesh::MeshReader;
pub use skeleton::SkeletonReader;

/// A single bone
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone, always lower than the index of this bone
    pub parent: Option<usize>,
}

/// An ordered list of bones where parents always precede their children
#[derive(Debug, Default, Clone, PartialEq, Eq, Deref, IntoIterator)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Bones(#[into_iterator(owned, ref)] Vec<Bone>);

impl Bones {
    pub fn new() -> Self {
        Bones::default()
    }

    /// Append a bone without a parent
    pub fn push_root(&mut self, name: String) {
        self.0.push(Bone { name, parent: None });
    }

    /// Append a bone linked to the parent index stored in the file.
    ///
    /// Negative indices mean the bone has no parent. Any other index must point at a bone that
    /// was already added.
    pub fn push_with_parent(&mut self, name: String, parent: i32) -> Result<()> {
        let len = self.0.len();
        let parent = match usize::try_from(parent) {
            Err(_) => None,
            Ok(index) if index < len => Some(index),
            Ok(_) => {
                return Err(CorruptDataError::ParentOutOfRange {
                    bone: len,
                    parent,
                    len,
                }
                .into())
            }
        };

        self.0.push(Bone { name, parent });
        Ok(())
    }

    /// Get the parent of the bone at `index`
    pub fn parent_of(&self, index: usize) -> Option<&Bone> {
        self.0
            .get(index)
            .and_then(|bone| bone.parent)
            .and_then(|parent| self.0.get(parent))
    }

    /// Iterate over the indices of bones without a parent
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, bone)| bone.parent.is_none())
            .map(|(i, _)| i)
    }

    /// Iterate over the indices of the direct children of the bone at `index`
    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(move |(_, bone)| bone.parent == Some(index))
            .map(|(i, _)| i)
    }
}

/// Reads the bone list out of a model file
pub trait BoneHierarchyReader {
    fn read<R: Read + Seek>(&self, cursor: &mut ByteCursor<R>) -> Result<Bones>;
}

/// Layout of a model file
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ModelFormat {
    /// Chunked mesh file with a `NODE` hierarchy chunk
    #[display("mesh")]
    Mesh,

    /// Flat skeleton file with bone names only
    #[display("skeleton")]
    Skeleton,
}

impl ModelFormat {
    /// Work out the layout of a model file from its signature
    #[instrument(skip(cursor), err)]
    pub fn detect<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<ModelFormat> {
        cursor.seek_absolute(0)?;
        let available = cursor.source_length().min(mesh::SIGNATURE.len() as u64) as usize;
        let mut bytes = cursor.read_bytes(available)?;
        cursor.seek_absolute(0)?;

        if bytes.starts_with(skeleton::SIGNATURE) {
            debug!("skeleton model");
            return Ok(ModelFormat::Skeleton);
        }

        bytes.reverse();
        if bytes == mesh::SIGNATURE {
            debug!("mesh model");
            return Ok(ModelFormat::Mesh);
        }

        bytes.reverse();
        Err(Error::InvalidSignature {
            offset: 0,
            expected: format!(
                "{} or {}",
                String::from_utf8_lossy(mesh::SIGNATURE),
                String::from_utf8_lossy(skeleton::SIGNATURE)
            ),
            found: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    /// Read the bone list using the reader for this layout
    pub fn read_bones<R: Read + Seek>(self, cursor: &mut ByteCursor<R>) -> Result<Bones> {
        match self {
            ModelFormat::Mesh => MeshReader.read(cursor),
            ModelFormat::Skeleton => SkeletonReader.read(cursor),
        }
    }
}

/// Check a signature at the current position, optionally stored back to front
pub(crate) fn expect_signature<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    expected: &[u8],
    reversed: bool,
) -> Result<()> {
    let offset = cursor.position()?;
    let mut found = cursor.read_bytes(expected.len())?;
    if reversed {
        found.reverse();
    }

    if found != expected {
        return Err(Error::InvalidSignature {
            offset,
            expected: String::from_utf8_lossy(expected).into_owned(),
            found: String::from_utf8_lossy(&found).into_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use crate::bones::{Bone, Bones, ModelFormat};
    use crate::cursor::ByteCursor;
    use crate::error::{CorruptDataError, Error, Result};

    #[test]
    fn parent_must_precede_child() -> Result<()> {
        let mut bones = Bones::new();
        bones.push_with_parent("root".into(), -1)?;
        bones.push_with_parent("spine".into(), 0)?;

        assert!(matches!(
            bones.push_with_parent("self".into(), 2),
            Err(Error::CorruptData(CorruptDataError::ParentOutOfRange {
                bone: 2,
                parent: 2,
                len: 2
            }))
        ));
        assert!(matches!(
            bones.push_with_parent("forward".into(), 7),
            Err(Error::CorruptData(CorruptDataError::ParentOutOfRange { .. }))
        ));
        assert_eq!(bones.len(), 2);

        Ok(())
    }

    #[test]
    fn hierarchy_queries() -> Result<()> {
        let mut bones = Bones::new();
        bones.push_with_parent("root".into(), -1)?;
        bones.push_with_parent("spine".into(), 0)?;
        bones.push_with_parent("l_thigh".into(), 0)?;
        bones.push_with_parent("head".into(), 1)?;
        bones.push_root("prop".into());

        assert_eq!(bones.roots().collect::<Vec<_>>(), vec![0, 4]);
        assert_eq!(bones.children(0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(bones.parent_of(3).map(|b| b.name.as_str()), Some("spine"));
        assert_eq!(bones.parent_of(0), None);
        assert_eq!(
            bones[4],
            Bone {
                name: "prop".into(),
                parent: None
            }
        );

        Ok(())
    }

    #[test]
    fn detect_formats() -> Result<()> {
        let mut mesh = ByteCursor::new(Cursor::new(b"HSEM\x2D\x00\x00\x00".to_vec()))?;
        assert_eq!(ModelFormat::detect(&mut mesh)?, ModelFormat::Mesh);
        assert_eq!(mesh.position()?, 0);

        let mut skeleton = ByteCursor::new(Cursor::new(b"SKL\x00\x00\x00\x00\x00".to_vec()))?;
        assert_eq!(ModelFormat::detect(&mut skeleton)?, ModelFormat::Skeleton);

        let mut short = ByteCursor::new(Cursor::new(b"SKL".to_vec()))?;
        assert_eq!(ModelFormat::detect(&mut short)?, ModelFormat::Skeleton);

        Ok(())
    }

    #[test]
    fn detect_unknown_format() -> Result<()> {
        let mut cursor = ByteCursor::new(Cursor::new(b"RIFF\x00\x00".to_vec()))?;

        match ModelFormat::detect(&mut cursor) {
            Err(Error::InvalidSignature {
                offset, found, ..
            }) => {
                assert_eq!(offset, 0);
                assert_eq!(found, "RIFF");
            }
            other => panic!("expected invalid signature, got {other:?}"),
        }

        Ok(())
    }
}
