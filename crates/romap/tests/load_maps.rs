//! End-to-end loading of hand-built map buffers through a byte source.

use romap::{AssetSource, Error, MemorySource, load_ground, load_world, load_world_with_ground};

/// Little-endian buffer builder for fixtures.
#[derive(Default)]
struct Buf(Vec<u8>);

impl Buf {
    fn magic(mut self, tag: &[u8; 4], major: u8, minor: u8) -> Self {
        self.0.extend_from_slice(tag);
        self.0.push(major);
        self.0.push(minor);
        self
    }

    fn u16(mut self, value: u16) -> Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn u32(mut self, value: u32) -> Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn i32(mut self, value: i32) -> Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn f32(mut self, value: f32) -> Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn bytes(mut self, data: &[u8]) -> Self {
        self.0.extend_from_slice(data);
        self
    }

    fn str(mut self, value: &str, width: usize) -> Self {
        let mut bytes = value.as_bytes().to_vec();
        bytes.resize(width, 0);
        self.0.extend_from_slice(&bytes);
        self
    }
}

/// A version-1.2 world naming `field.gnd`, with no objects.
fn world_fixture() -> Vec<u8> {
    Buf::default()
        .magic(b"GRSW", 1, 2)
        .str("field.ini", 40)
        .str("field.gnd", 40)
        .str("field.gat", 40)
        .i32(0)
        .0
}

/// A 1x1 ground mesh with one texture, one tile, one surface.
fn ground_fixture() -> Vec<u8> {
    Buf::default()
        .magic(b"GRGN", 1, 7)
        .u32(1)
        .u32(1)
        .f32(10.0)
        .u32(1) // texture slots
        .u32(32)
        .str("grass.bmp", 32)
        .u32(0) // lightmap count
        .i32(8)
        .i32(8)
        .i32(1)
        .u32(1) // tiles
        .f32(0.0)
        .f32(1.0)
        .f32(0.0)
        .f32(1.0)
        .f32(0.0)
        .f32(0.0)
        .f32(1.0)
        .f32(1.0)
        .u16(0)
        .u16(0)
        .bytes(&[255, 255, 255, 255])
        // surface
        .f32(5.0)
        .f32(5.0)
        .f32(5.0)
        .f32(5.0)
        .i32(0)
        .i32(-1)
        .i32(-1)
        .0
}

fn source_with_map() -> MemorySource {
    let mut source = MemorySource::new();
    source.insert("data\\field.rsw", world_fixture());
    source.insert("data\\field.gnd", ground_fixture());
    source
}

#[test]
fn world_follows_its_ground_reference() {
    let source = source_with_map();
    let (world, ground) = load_world_with_ground(&source, "data\\field.rsw").unwrap();
    assert_eq!(world.files.gnd, "field.gnd");
    assert_eq!((ground.width, ground.height), (1, 1));
    assert_eq!(ground.surfaces.len(), 1);
    assert_eq!(ground.textures, ["grass.bmp"]);
}

#[test]
fn entry_lookup_is_case_insensitive() {
    let source = source_with_map();
    assert!(load_world(&source, "data\\FIELD.RSW").is_ok());
}

#[test]
fn missing_entry_is_reported_by_name() {
    let source = source_with_map();
    match load_ground(&source, "data\\other.gnd") {
        Err(Error::MissingEntry(name)) => assert_eq!(name, "data\\other.gnd"),
        other => panic!("expected MissingEntry, got {other:?}"),
    }
}

#[test]
fn missing_ground_behind_a_world_is_reported() {
    let mut source = MemorySource::new();
    source.insert("data\\field.rsw", world_fixture());
    assert!(matches!(
        load_world_with_ground(&source, "data\\field.rsw"),
        Err(Error::MissingEntry(_))
    ));
}

#[test]
fn corrupt_entry_surfaces_a_decode_error() {
    let mut source = MemorySource::new();
    let mut truncated = world_fixture();
    truncated.truncate(60);
    source.insert("data\\field.rsw", truncated);
    assert!(matches!(
        load_world(&source, "data\\field.rsw"),
        Err(Error::Decode(_))
    ));
}

#[test]
fn sources_compose_through_the_trait() {
    // Callers hand any AssetSource impl to the loaders.
    fn load_via_trait<S: AssetSource>(source: &S) -> Result<romap::WorldDocument, Error> {
        load_world(source, "data\\field.rsw")
    }
    assert!(load_via_trait(&source_with_map()).is_ok());
}
