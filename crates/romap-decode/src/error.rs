//! Decode error types.

use crate::reader::TextEncoding;

/// Result alias used throughout the decoding crate.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors produced while decoding a map document.
///
/// Every variant is fatal to the decode that raised it: the binary
/// formats carry no resynchronization points, so a partially decoded
/// document is never returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The leading magic bytes did not match the expected format tag.
    #[error("invalid magic: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        expected: [u8; 4],
        found: [u8; 4],
    },

    /// A read ran past the end of the input buffer. Signals either a
    /// truncated file or a version gate that disagrees with the data.
    #[error("unexpected end of data: needed {needed} bytes at offset {offset}, {remaining} remaining")]
    UnexpectedEndOfData {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A fixed-width string field was not valid under its declared
    /// text encoding.
    #[error("bytes at offset {offset} are not valid {encoding}")]
    InvalidEncoding {
        offset: usize,
        encoding: TextEncoding,
    },

    /// A ground texture table grew past the 65536 unique names that a
    /// tile's 16-bit index can address.
    #[error("texture table entry at offset {offset} exceeds 65536 unique names")]
    TextureTableTooLarge { offset: usize },

    /// A ground tile referenced a texture-table slot that does not
    /// exist. The slot count is fixed before any tile is read, so this
    /// only happens on corrupt input.
    #[error("tile texture index {index} at offset {offset} is outside the {count}-entry table")]
    InvalidTextureIndex {
        index: u16,
        count: usize,
        offset: usize,
    },

    /// A world object record carried a type tag outside the known set.
    /// Unknown records have unknown lengths, so continuing would
    /// desynchronize every subsequent read.
    #[error("unknown object type tag {tag} at offset {offset}")]
    UnknownObjectType { tag: i32, offset: usize },
}
