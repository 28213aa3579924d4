//! Byte sources for map assets.
//!
//! The decoders consume fully materialized byte buffers; a source is
//! anything that can produce one for an entry name. Entry names follow
//! the client's archive conventions: backslash separators under a
//! `data\` root, matched case-insensitively.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Resolves entry names to raw byte buffers.
pub trait AssetSource {
    /// Return the full contents of `name`, or `io::ErrorKind::NotFound`
    /// if the source has no such entry.
    fn entry(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Canonical form used for entry comparison: lowercase, forward
/// slashes.
fn normalize(name: &str) -> String {
    name.to_lowercase().replace('\\', "/")
}

/// A source backed by a directory of extracted game files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirectorySource {
    fn entry(&self, name: &str) -> io::Result<Vec<u8>> {
        let mut path = self.root.clone();
        for part in normalize(name).split('/') {
            // Lookups stay under the root: no empty, current-dir, or
            // parent-dir components.
            if part.is_empty() || part == "." || part == ".." {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("entry name {name:?} does not stay under the source root"),
                ));
            }
            path.push(part);
        }
        std::fs::read(path)
    }
}

/// An in-memory source, for tests and for callers that already hold
/// extracted archive payloads.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `data` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: &str, data: Vec<u8>) {
        self.entries.insert(normalize(name), data);
    }
}

impl AssetSource for MemorySource {
    fn entry(&self, name: &str) -> io::Result<Vec<u8>> {
        self.entries
            .get(&normalize(name))
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}
