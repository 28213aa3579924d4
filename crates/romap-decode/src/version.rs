//! Format revision numbers.

use std::fmt;

use crate::error::DecodeResult;
use crate::reader::ByteReader;

/// A `(major, minor)` revision pair read from a document header.
///
/// Every format revision added, reinterpreted, or rescaled fields
/// in-place, so decoders gate each optional field group on a threshold
/// comparison against a literal version. Ordering is lexicographic on
/// `(major, minor)`, which the derived impls provide for this field
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
}

impl FormatVersion {
    #[must_use]
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Read the two version bytes that follow a format's magic tag.
    pub fn read(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        let major = reader.read_u8()?;
        let minor = reader.read_u8()?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
