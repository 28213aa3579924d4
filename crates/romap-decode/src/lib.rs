//! Decode world and ground-mesh files from the classic Ragnarok Online
//! client.
//!
//! This crate provides pure synchronous decoding functions for the
//! legacy binary map formats: `.rsw` world descriptors and `.gnd`
//! ground meshes. Each decode call is a function from a byte buffer to
//! a frozen document value; the caller is responsible for obtaining the
//! bytes (from the filesystem or a game archive) and for any
//! parallelism across documents.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives, no I/O
//! - **No retained input**: Documents never alias the source buffer
//! - **Fail fast**: Any malformed read aborts the whole decode; a
//!   partial document is never returned
//!
//! # Key functions
//!
//! - [`decode_world`]: Decode a `.rsw` world descriptor
//! - [`decode_ground`]: Decode a `.gnd` ground mesh
//! - [`AtlasLayout`]: Texture-atlas packing math used for tile UVs

mod error;

pub mod atlas;
pub mod gnd;
pub mod reader;
pub mod rsw;
pub mod version;

pub use atlas::AtlasLayout;
pub use error::{DecodeError, DecodeResult};
pub use gnd::{GroundDocument, decode_ground};
pub use reader::{ByteReader, TextEncoding};
pub use rsw::{WorldDocument, WorldObject, decode_world};
pub use version::FormatVersion;
