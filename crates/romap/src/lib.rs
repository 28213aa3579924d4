//! High-level loading of Ragnarok Online map documents.
//!
//! Thin synchronous wrapper over [`romap_decode`]: a [`source::AssetSource`]
//! produces raw bytes, the decode crate turns them into documents. The
//! one piece of flow logic lives in [`load_world_with_ground`], which
//! follows a world descriptor's embedded ground-file reference the way
//! the original client's world preview does.

use std::io;

pub mod source;

pub use romap_decode::{DecodeError, FormatVersion, GroundDocument, WorldDocument};
pub use source::{AssetSource, DirectorySource, MemorySource};

/// Errors from loading and decoding a map asset.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source has no entry under the requested name.
    #[error("no entry named {0:?}")]
    MissingEntry(String),

    /// The source failed to produce the entry's bytes.
    #[error("failed to read entry")]
    Io(#[from] io::Error),

    /// The entry's bytes did not decode as the expected format.
    #[error("failed to decode entry")]
    Decode(#[from] DecodeError),
}

fn fetch(source: &impl AssetSource, name: &str) -> Result<Vec<u8>, Error> {
    source.entry(name).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            Error::MissingEntry(name.to_owned())
        } else {
            Error::Io(err)
        }
    })
}

/// Load and decode a world descriptor.
pub fn load_world(source: &impl AssetSource, name: &str) -> Result<WorldDocument, Error> {
    let data = fetch(source, name)?;
    let document = romap_decode::decode_world(&data)?;
    tracing::debug!(
        name,
        version = %document.version,
        models = document.models.len(),
        lights = document.lights.len(),
        sounds = document.sounds.len(),
        effects = document.effects.len(),
        "decoded world"
    );
    Ok(document)
}

/// Load and decode a ground mesh.
pub fn load_ground(source: &impl AssetSource, name: &str) -> Result<GroundDocument, Error> {
    let data = fetch(source, name)?;
    let document = romap_decode::decode_ground(&data)?;
    tracing::debug!(
        name,
        version = %document.version,
        width = document.width,
        height = document.height,
        textures = document.textures.len(),
        "decoded ground"
    );
    Ok(document)
}

/// Load a world descriptor, then the ground mesh it names.
///
/// The ground reference is resolved under the client's `data\` entry
/// namespace, lowercased, matching the original archive lookups.
pub fn load_world_with_ground(
    source: &impl AssetSource,
    name: &str,
) -> Result<(WorldDocument, GroundDocument), Error> {
    let world = load_world(source, name)?;
    let ground_entry = format!("data\\{}", world.files.gnd.to_lowercase());
    let ground = load_ground(source, &ground_entry)?;
    Ok((world, ground))
}
