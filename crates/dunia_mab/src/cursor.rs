//! Positional little endian reads over a seekable source
//!

use binrw::BinRead;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{Error, Result};

/// Random access reader used by every parser in this crate.
///
/// Offsets in MAB and model files are frequently derived from values read earlier, so reads
/// are always performed in file order against the current position.
#[derive(Debug)]
pub struct ByteCursor<R> {
    inner: R,
    length: u64,
}

impl<R: Read + Seek> ByteCursor<R> {
    /// Wrap a source, recording its total length and rewinding it to the start.
    pub fn new(mut inner: R) -> Result<Self> {
        let length = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(ByteCursor { inner, length })
    }

    /// Total length of the source in bytes
    pub fn source_length(&self) -> u64 {
        self.length
    }

    /// Current absolute position
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Move to an absolute offset from the start of the source
    pub fn seek_absolute(&mut self, pos: u64) -> Result<u64> {
        Ok(self.inner.seek(SeekFrom::Start(pos))?)
    }

    /// Move relative to the current position
    pub fn seek_relative(&mut self, delta: i64) -> Result<u64> {
        Ok(self.inner.seek(SeekFrom::Current(delta))?)
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.inner.read_u8()?)
    }

    /// Read a little endian `u16`
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.inner.read_u16::<LittleEndian>()?)
    }

    /// Read a little endian `i16`
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.inner.read_i16::<LittleEndian>()?)
    }

    /// Read a little endian `u32`
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.inner.read_u32::<LittleEndian>()?)
    }

    /// Read a little endian `i32`
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.inner.read_i32::<LittleEndian>()?)
    }

    /// Read a little endian `f32`
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.inner.read_f32::<LittleEndian>()?)
    }

    /// Read `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let position = self.position()?;
        if position.saturating_add(len as u64) > self.length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{len} bytes at {position:#x} run past the end of the source"),
            )
            .into());
        }

        let mut buffer = vec![0u8; len];
        self.inner.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read a fixed length ASCII string.
    ///
    /// Any byte above `0x7F` is rejected with [`Error::InvalidText`].
    pub fn read_fixed_ascii(&mut self, len: usize) -> Result<String> {
        let offset = self.position()?;
        let buffer = self.read_bytes(len)?;
        if !buffer.is_ascii() {
            return Err(Error::InvalidText { offset });
        }

        Ok(buffer.into_iter().map(char::from).collect())
    }

    /// Read a fixed size little endian record
    pub fn read_le<T>(&mut self) -> Result<T>
    where
        T: for<'a> BinRead<Args<'a> = ()>,
    {
        T::read_le(&mut self.inner).map_err(|e| {
            if e.is_eof() {
                io::Error::new(io::ErrorKind::UnexpectedEof, e.to_string()).into()
            } else {
                Error::BinRWError(e)
            }
        })
    }
}
