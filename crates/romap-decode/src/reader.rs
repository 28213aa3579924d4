//! Forward-only byte cursor over an in-memory buffer.
//!
//! All of the map formats are flat little-endian streams read strictly
//! front to back, so the cursor exposes no seek or rewind. Reads that
//! would cross the end of the buffer fail instead of truncating.

use std::fmt;

use crate::error::{DecodeError, DecodeResult};

/// Text encodings used by fixed-width string fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Plain 7-bit ASCII.
    Ascii,
    /// The legacy Korean multi-byte encoding (EUC-KR) used for asset
    /// names authored in the original client.
    KoreanEuc,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascii => f.write_str("ASCII"),
            Self::KoreanEuc => f.write_str("EUC-KR"),
        }
    }
}

/// Sequential reader over a borrowed byte buffer.
///
/// The reader never outlives a decode call; finished documents hold no
/// reference to it or to the source bytes.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read position, in bytes from the start of the buffer.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left between the cursor and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Consume the next `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> DecodeResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(DecodeError::UnexpectedEndOfData {
                offset: self.offset,
                needed: count,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + count];
        self.offset += count;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        // read_bytes guarantees the length.
        Ok(bytes.try_into().unwrap_or([0; N]))
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> DecodeResult<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> DecodeResult<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Consume a 4-byte magic tag and verify it against `expected`.
    pub fn expect_magic(&mut self, expected: [u8; 4]) -> DecodeResult<()> {
        let found: [u8; 4] = self.read_array()?;
        if found == expected {
            Ok(())
        } else {
            Err(DecodeError::InvalidMagic { expected, found })
        }
    }

    /// Consume exactly `count` bytes holding a NUL-padded string and
    /// decode the portion before the first NUL under `encoding`.
    pub fn read_fixed_str(
        &mut self,
        count: usize,
        encoding: TextEncoding,
    ) -> DecodeResult<String> {
        let start = self.offset;
        let raw = self.read_bytes(count)?;
        let trimmed = match raw.iter().position(|&b| b == 0) {
            Some(end) => &raw[..end],
            None => raw,
        };

        let invalid = || DecodeError::InvalidEncoding {
            offset: start,
            encoding,
        };

        match encoding {
            TextEncoding::Ascii => {
                if trimmed.is_ascii() {
                    // Safe to go through UTF-8: ASCII is a subset.
                    Ok(String::from_utf8_lossy(trimmed).into_owned())
                } else {
                    Err(invalid())
                }
            }
            TextEncoding::KoreanEuc => encoding_rs::EUC_KR
                .decode_without_bom_handling_and_without_replacement(trimmed)
                .map(std::borrow::Cow::into_owned)
                .ok_or_else(invalid),
        }
    }
}
