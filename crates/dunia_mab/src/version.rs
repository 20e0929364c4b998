//! Engine build detection from the MAB header

use derive_more::derive::Display;
use std::io::{Read, Seek};
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

/// Engine build a MAB file was written by, identified by its first byte
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[repr(u8)]
pub enum FormatVersion {
    #[display("Far Cry 2")]
    FarCry2 = 0x4C,

    #[display("Far Cry 3")]
    FarCry3 = 0x61,

    #[display("Far Cry 3: Blood Dragon")]
    FarCry3BloodDragon = 0x62,

    #[display("Far Cry 4")]
    FarCry4 = 0x81,

    #[display("Far Cry Primal")]
    FarCryPrimal = 0x82,

    #[display("Far Cry 5/New Dawn")]
    FarCry5 = 0xB0,
}

impl FormatVersion {
    /// Whether the rest of this crate knows how to decode files of this build
    pub fn is_supported(self) -> bool {
        matches!(self, FormatVersion::FarCry3)
    }
}

impl TryFrom<u8> for FormatVersion {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x4C => Ok(FormatVersion::FarCry2),
            0x61 => Ok(FormatVersion::FarCry3),
            0x62 => Ok(FormatVersion::FarCry3BloodDragon),
            0x81 => Ok(FormatVersion::FarCry4),
            0x82 => Ok(FormatVersion::FarCryPrimal),
            0xB0 => Ok(FormatVersion::FarCry5),
            _ => Err(Error::UnknownFormat(value)),
        }
    }
}

impl From<FormatVersion> for u8 {
    fn from(value: FormatVersion) -> Self {
        value as u8
    }
}

/// Read the version byte at the start of a MAB file.
///
/// Fails with [`Error::UnknownFormat`] for bytes outside the table and with
/// [`Error::UnsupportedVersion`] for builds that can't be decoded yet.
#[instrument(skip(cursor), err)]
pub fn probe<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<FormatVersion> {
    cursor.seek_absolute(0)?;
    let version = FormatVersion::try_from(cursor.read_u8()?)?;
    debug!("{version} MAB file");

    if !version.is_supported() {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(version)
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use crate::cursor::ByteCursor;
    use crate::error::{Error, Result};
    use crate::version::{probe, FormatVersion};

    #[test]
    fn probe_supported() -> Result<()> {
        let mut cursor = ByteCursor::new(Cursor::new(vec![0x61, 0x00, 0x00]))?;
        assert_eq!(probe(&mut cursor)?, FormatVersion::FarCry3);

        Ok(())
    }

    #[test]
    fn probe_unsupported() -> Result<()> {
        for byte in [0x4C, 0x62, 0x81, 0x82, 0xB0] {
            let mut cursor = ByteCursor::new(Cursor::new(vec![byte]))?;
            match probe(&mut cursor) {
                Err(Error::UnsupportedVersion(version)) => assert_eq!(u8::from(version), byte),
                other => panic!("expected unsupported version, got {other:?}"),
            }
        }

        Ok(())
    }

    #[test]
    fn probe_unknown() -> Result<()> {
        let mut cursor = ByteCursor::new(Cursor::new(vec![0x00]))?;
        assert!(matches!(probe(&mut cursor), Err(Error::UnknownFormat(0x00))));

        Ok(())
    }

    #[test]
    fn probe_empty_file() -> Result<()> {
        let mut cursor = ByteCursor::new(Cursor::new(Vec::new()))?;
        assert!(matches!(probe(&mut cursor), Err(Error::IOError(_))));

        Ok(())
    }

    #[test]
    fn display_names() {
        assert_eq!(FormatVersion::FarCry3.to_string(), "Far Cry 3");
        assert_eq!(
            FormatVersion::FarCry3BloodDragon.to_string(),
            "Far Cry 3: Blood Dragon"
        );
    }
}
