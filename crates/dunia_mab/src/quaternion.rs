//! Smallest-three compressed quaternions
//!
//! Rotations are stored as three 16 bit words. Two of the words carry a 15 bit magnitude and
//! use their top bit as a selector, the third is a plain signed value:
//!
//! | Word | Bits   | Meaning                                                   |
//! |------|--------|-----------------------------------------------------------|
//! | a    | 0..15  | First stored component                                    |
//! | a    | 15     | Selector high bit                                         |
//! | b    | 0..15  | Second stored component                                   |
//! | b    | 15     | Selector low bit                                          |
//! | c    | 0..16  | Third stored component, signed                            |
//!
//! Every stored value maps onto `[-1/√2, 1/√2]` and the remaining component is rebuilt from
//! the unit length constraint. The selector bits name the slot the rebuilt component goes in:
//!
//! | a.15 | b.15 | (x, y, z, w)                 |
//! |------|------|------------------------------|
//! | 0    | 0    | (rebuilt, v1, v2, v3)        |
//! | 1    | 0    | (v1, rebuilt, v2, v3)        |
//! | 0    | 1    | (v1, v2, rebuilt, v3)        |
//! | 1    | 1    | (v1, v2, v3, rebuilt)        |

use binrw::BinRead;
use derive_more::derive::Display;
use hex::FromHex;
use std::io::{Read, Seek};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

/// Size of one quantization step
pub const QUANTIZATION_STEP: f64 = 4.315969e-05;

/// Offset subtracted after scaling, `1/√2` rounded the way the engine stores it
pub const QUANTIZATION_OFFSET: f64 = 0.7071068;

const MAGNITUDE_MASK: u16 = 0x7FFF;
const SELECTOR_BIT: u16 = 0x8000;

/// Three raw words of a packed quaternion, as stored on disk
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct PackedQuaternion {
    pub a: u16,
    pub b: u16,
    pub c: i16,
}

impl PackedQuaternion {
    pub fn new(a: u16, b: u16, c: i16) -> Self {
        PackedQuaternion { a, b, c }
    }

    /// Parse a packed quaternion from 12 hex characters (6 bytes, little endian words).
    ///
    /// Whitespace between the characters is ignored.
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = <[u8; 6]>::from_hex(&digits).map_err(|_| Error::InvalidHex(text.to_owned()))?;

        Ok(PackedQuaternion {
            a: u16::from_le_bytes([bytes[0], bytes[1]]),
            b: u16::from_le_bytes([bytes[2], bytes[3]]),
            c: i16::from_le_bytes([bytes[4], bytes[5]]),
        })
    }

    /// Decode into a unit quaternion, or `None` when the stored values can't be part of one
    pub fn unpack(&self) -> Option<Quaternion> {
        unpack(self.a, self.b, self.c)
    }
}

/// A rotation quaternion
#[derive(Debug, Copy, Clone, PartialEq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[display("Quaternion(x={x:.10}, y={y:.10}, z={z:.10}, w={w:.10})")]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Euler angles in degrees
#[derive(Debug, Copy, Clone, PartialEq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[display("({pitch:.4}, {yaw:.4}, {roll:.4})")]
pub struct EulerAngles {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Quaternion { x, y, z, w }
    }

    /// Sum of the squared components, `1` for a unit quaternion
    pub fn norm_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Pitch, yaw and roll in degrees
    pub fn euler(&self) -> EulerAngles {
        let Quaternion { x, y, z, w } = *self;

        let pitch = (-2.0 * (x * z - w * y)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (y * z + w * x)).atan2(w * w - x * x - y * y + z * z);
        let roll = (2.0 * (x * y + w * z)).atan2(w * w + x * x - y * y - z * z);

        EulerAngles {
            pitch: pitch.to_degrees(),
            yaw: yaw.to_degrees(),
            roll: roll.to_degrees(),
        }
    }
}

fn dequantize(raw: f64) -> f64 {
    raw * QUANTIZATION_STEP - QUANTIZATION_OFFSET
}

/// Unpack three stored words into a quaternion.
///
/// `a` and `b` only contribute their low 15 bits to the value while `c` is used as a full
/// signed word. Returns `None` when the three values are too large to belong to a unit
/// quaternion.
pub fn unpack(a: u16, b: u16, c: i16) -> Option<Quaternion> {
    let v1 = dequantize((a & MAGNITUDE_MASK) as f64);
    let v2 = dequantize((b & MAGNITUDE_MASK) as f64);
    let v3 = dequantize(c as f64);

    let residual = 1.0 - v1 * v1 - v2 * v2 - v3 * v3;
    if residual < 0.0 {
        return None;
    }
    let derived = residual.sqrt();

    let (x, y, z, w) = match (a & SELECTOR_BIT != 0, b & SELECTOR_BIT != 0) {
        (false, true) => (v1, v2, derived, v3),
        (true, true) => (v1, v2, v3, derived),
        (true, false) => (v1, derived, v2, v3),
        (false, false) => (derived, v1, v2, v3),
    };

    Some(Quaternion::new(x, y, z, w))
}

/// A quaternion decoded at a known position in the file
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct QuaternionSample {
    /// Absolute offset of the packed words
    pub offset: u64,
    /// `None` when the packed words don't form a valid quaternion
    pub rotation: Option<Quaternion>,
}

impl QuaternionSample {
    /// Read and decode one packed quaternion at the current position.
    ///
    /// Invalid quaternions are kept as samples without a rotation so callers can carry on.
    pub fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<QuaternionSample> {
        let offset = cursor.position()?;
        let packed: PackedQuaternion = cursor.read_le()?;
        let rotation = packed.unpack();
        if rotation.is_none() {
            warn!("bad quaternion at {offset:#x}: {packed:?}");
        }

        Ok(QuaternionSample { offset, rotation })
    }

    /// Whether the packed words decoded to a rotation
    pub fn is_valid(&self) -> bool {
        self.rotation.is_some()
    }
}

/// Decode a packed quaternion given as 12 hex characters
pub fn decode_hex(text: &str) -> Result<Option<Quaternion>> {
    Ok(PackedQuaternion::from_hex(text)?.unpack())
}
