//! Full decode of an animation and the model it animates

use bon::Builder;
use std::io::{Read, Seek};
use tracing::{info, instrument};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::bones::{Bones, ModelFormat};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::keyframes::{read_keyframes, KeyframeSubsection};
use crate::quaternion::QuaternionSample;
use crate::rotation::read_root_rotations;
use crate::sections::{AnimationHeader, SectionTable};
use crate::version;

/// Options for [`Decoder`]
#[derive(Debug, Default, Clone, Copy, Builder)]
pub struct DecodeOptions {
    /// Layout of the model file, detected from its signature when unset
    pub model_format: Option<ModelFormat>,
}

/// Everything decoded from one animation and its model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DecodeResult {
    pub header: AnimationHeader,
    pub sections: SectionTable,
    pub bones: Bones,
    pub root_rotations: Vec<QuaternionSample>,
    pub keyframes: Vec<KeyframeSubsection>,
}

impl DecodeResult {
    /// Number of quaternions that failed to decode, across root rotations and keyframes
    pub fn invalid_count(&self) -> usize {
        self.root_rotations.iter().filter(|s| !s.is_valid()).count()
            + self
                .keyframes
                .iter()
                .map(KeyframeSubsection::invalid_count)
                .sum::<usize>()
    }
}

/// MAB animation decoder
///
/// ```no_run
/// # fn doit() -> dunia_mab::error::Result<()>
/// # {
/// use std::fs::File;
/// use dunia_mab::{DecodeOptions, Decoder, ModelFormat};
///
/// let decoder = Decoder::new(DecodeOptions::builder().model_format(ModelFormat::Mesh).build());
/// let result = decoder.decode(File::open("walk.mab")?, File::open("character.xbg")?)?;
///
/// for bone in result.bones.iter() {
///     println!("{}", bone.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Decoder {
        Decoder { options }
    }

    /// Decode an animation along with the bones of its model.
    ///
    /// Structural problems in either file abort the decode, quaternions that fail to unpack
    /// are kept in the result as invalid samples.
    #[instrument(skip_all, err)]
    pub fn decode<A, M>(&self, animation: A, model: M) -> Result<DecodeResult>
    where
        A: Read + Seek,
        M: Read + Seek,
    {
        let mut animation = ByteCursor::new(animation)?;
        let mut model = ByteCursor::new(model)?;

        let version = version::probe(&mut animation)?;
        let sections = SectionTable::read(&mut animation)?;
        let header = AnimationHeader::read(&mut animation, version)?;

        let format = match self.options.model_format {
            Some(format) => format,
            None => ModelFormat::detect(&mut model)?,
        };
        let bones = format.read_bones(&mut model)?;

        let root_rotations = read_root_rotations(&mut animation, sections.rotation)?;
        let keyframes = read_keyframes(&mut animation, sections.keyframes, &header)?;

        let result = DecodeResult {
            header,
            sections,
            bones,
            root_rotations,
            keyframes,
        };
        info!(
            bones = result.bones.len(),
            rotations = result.root_rotations.len(),
            subsections = result.keyframes.len(),
            invalid = result.invalid_count(),
            "decoded {} animation",
            result.header.version
        );

        Ok(result)
    }
}
