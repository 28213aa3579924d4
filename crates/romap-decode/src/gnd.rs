//! Ground mesh (`.gnd`) decoding.
//!
//! Terrain is a `width x height` grid of surfaces, each referencing up
//! to three tiles (top face plus the two visible side walls), with a
//! shared texture table and a baked lightmap. Decoding is two-phase:
//! the texture table must be complete before any tile is read, because
//! the atlas layout that tile UVs are rewritten against is a function
//! of the final deduplicated texture count.

use glam::Vec4;

use crate::atlas::AtlasLayout;
use crate::error::{DecodeError, DecodeResult};
use crate::reader::{ByteReader, TextEncoding};
use crate::rsw::UNIT_DIVISOR;
use crate::version::FormatVersion;

/// Leading tag of every ground mesh file.
pub const MAGIC: [u8; 4] = *b"GRGN";

/// On-disk byte width of one tile record (8 floats, 2 shorts, 4 bytes).
const TILE_BYTES: u64 = 40;

/// On-disk byte width of one surface record (4 floats, 3 ints).
const SURFACE_BYTES: u64 = 28;

/// Baked per-cell luminance data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightmap {
    /// Number of lightmap cells.
    pub count: u32,
    /// Bytes per cell (`x_subdivisions * y_subdivisions * cell_size`).
    pub per_cell: i32,
    /// Raw payload, `count * per_cell * 4` bytes.
    pub data: Vec<u8>,
}

/// One textured tile face.
///
/// After decoding, `texture` indexes the deduplicated texture table and
/// the UVs are in atlas space, not the raw per-tile `[0, 1]` space
/// stored on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub u: [f32; 4],
    pub v: [f32; 4],
    pub texture: u16,
    pub light: u16,
    /// RGBA vertex tint.
    pub color: [u8; 4],
}

/// One cell of the height-field grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Corner heights, already converted out of fifth-unit scale.
    pub heights: Vec4,
    /// Tile index for the top face, `-1` if none.
    pub tile_up: i32,
    /// Tile index for the front wall, `-1` if none.
    pub tile_front: i32,
    /// Tile index for the right wall, `-1` if none.
    pub tile_right: i32,
}

/// A fully decoded ground mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundDocument {
    pub version: FormatVersion,
    pub width: u32,
    pub height: u32,
    pub zoom: f32,
    /// Deduplicated texture names, in first-occurrence order.
    pub textures: Vec<String>,
    /// Occurrence -> dedup index, one entry per on-disk table slot.
    pub texture_indices: Vec<u16>,
    pub lightmap: Lightmap,
    pub tiles: Vec<Tile>,
    /// Exactly `width * height` records, row-major.
    pub surfaces: Vec<Surface>,
}

/// Decode a ground mesh from raw file bytes.
pub fn decode_ground(data: &[u8]) -> DecodeResult<GroundDocument> {
    let mut reader = ByteReader::new(data);
    reader.expect_magic(MAGIC)?;
    let version = FormatVersion::read(&mut reader)?;

    let width = reader.read_u32()?;
    let height = reader.read_u32()?;
    let zoom = reader.read_f32()?;

    let (textures, texture_indices) = read_texture_table(&mut reader)?;
    let lightmap = read_lightmap(&mut reader)?;

    // The table is final here; tiles may now be remapped against it.
    let layout = AtlasLayout::new(textures.len());
    let tiles = read_tiles(&mut reader, &texture_indices, &layout)?;
    let surfaces = read_surfaces(&mut reader, width, height)?;

    Ok(GroundDocument {
        version,
        width,
        height,
        zoom,
        textures,
        texture_indices,
        lightmap,
        tiles,
        surfaces,
    })
}

/// Check up front that `count` records of `record_bytes` each can
/// still be present in the buffer. Counts come straight from untrusted
/// headers, so this runs before any reservation sized from them; an
/// impossible count is truncation, reported from where the records
/// would begin.
fn check_record_space(
    reader: &ByteReader<'_>,
    count: u64,
    record_bytes: u64,
) -> DecodeResult<()> {
    let needed = count.saturating_mul(record_bytes);
    if needed > reader.remaining() as u64 {
        return Err(DecodeError::UnexpectedEndOfData {
            offset: reader.offset(),
            needed: usize::try_from(needed).unwrap_or(usize::MAX),
            remaining: reader.remaining(),
        });
    }
    Ok(())
}

/// Read the texture name table, collapsing repeated names.
///
/// Returns the deduplicated names plus the occurrence table mapping
/// each on-disk slot to its dedup index.
fn read_texture_table(reader: &mut ByteReader<'_>) -> DecodeResult<(Vec<String>, Vec<u16>)> {
    let count = reader.read_u32()?;
    let length = reader.read_u32()? as usize;
    // Count every slot as at least one byte so a zero string width
    // cannot make an oversized table look plausible.
    check_record_space(reader, u64::from(count), length.max(1) as u64)?;

    let mut textures: Vec<String> = Vec::new();
    let mut indices = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let entry_offset = reader.offset();
        let name = reader.read_fixed_str(length, TextEncoding::KoreanEuc)?;
        indices.push(dedup_index(&mut textures, name, entry_offset)?);
    }

    Ok((textures, indices))
}

/// Return the dedup index for `name`, appending it on first sight.
///
/// Tiles address the table through 16-bit indices, so a table with
/// more than `u16::MAX + 1` unique names cannot be represented.
fn dedup_index(textures: &mut Vec<String>, name: String, offset: usize) -> DecodeResult<u16> {
    let index = match textures.iter().position(|known| *known == name) {
        Some(existing) => existing,
        None => {
            textures.push(name);
            textures.len() - 1
        }
    };
    u16::try_from(index).map_err(|_| DecodeError::TextureTableTooLarge { offset })
}

fn read_lightmap(reader: &mut ByteReader<'_>) -> DecodeResult<Lightmap> {
    let count = reader.read_u32()?;
    let per_cell_x = reader.read_i32()?;
    let per_cell_y = reader.read_i32()?;
    let cell_size = reader.read_i32()?;
    let per_cell = per_cell_x
        .saturating_mul(per_cell_y)
        .saturating_mul(cell_size);

    // Absurd cell geometry saturates into an oversized request that the
    // reader rejects as truncated input.
    let payload = u64::from(count)
        .saturating_mul(u64::try_from(per_cell.max(0)).unwrap_or(0))
        .saturating_mul(4);
    let data = reader
        .read_bytes(usize::try_from(payload).unwrap_or(usize::MAX))?
        .to_vec();

    Ok(Lightmap {
        count,
        per_cell,
        data,
    })
}

fn read_tiles(
    reader: &mut ByteReader<'_>,
    texture_indices: &[u16],
    layout: &AtlasLayout,
) -> DecodeResult<Vec<Tile>> {
    let count = reader.read_u32()?;
    check_record_space(reader, u64::from(count), TILE_BYTES)?;
    let mut tiles = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let mut u = [0.0; 4];
        let mut v = [0.0; 4];
        for value in &mut u {
            *value = reader.read_f32()?;
        }
        for value in &mut v {
            *value = reader.read_f32()?;
        }
        let occurrence_offset = reader.offset();
        let occurrence = reader.read_u16()?;
        let light = reader.read_u16()?;
        let color = [
            reader.read_u8()?,
            reader.read_u8()?,
            reader.read_u8()?,
            reader.read_u8()?,
        ];

        // The stored index points at a table slot, not a texture;
        // collapse it to the dedup index before touching the atlas.
        let texture = texture_indices
            .get(usize::from(occurrence))
            .copied()
            .ok_or(DecodeError::InvalidTextureIndex {
                index: occurrence,
                count: texture_indices.len(),
                offset: occurrence_offset,
            })?;

        for value in &mut u {
            *value = layout.remap_u(texture, *value);
        }
        for value in &mut v {
            *value = layout.remap_v(texture, *value);
        }

        tiles.push(Tile {
            u,
            v,
            texture,
            light,
            color,
        });
    }

    Ok(tiles)
}

/// Read the height-field grid. No count is stored on disk; exactly
/// `width * height` records must be present.
fn read_surfaces(
    reader: &mut ByteReader<'_>,
    width: u32,
    height: u32,
) -> DecodeResult<Vec<Surface>> {
    let count = u64::from(width) * u64::from(height);
    check_record_space(reader, count, SURFACE_BYTES)?;
    // The space check just bounded count by the buffer length.
    let count = usize::try_from(count).unwrap_or(usize::MAX);
    let mut surfaces = Vec::with_capacity(count);

    for _ in 0..count {
        surfaces.push(Surface {
            heights: Vec4::new(
                reader.read_f32()? / UNIT_DIVISOR,
                reader.read_f32()? / UNIT_DIVISOR,
                reader.read_f32()? / UNIT_DIVISOR,
                reader.read_f32()? / UNIT_DIVISOR,
            ),
            tile_up: reader.read_i32()?,
            tile_front: reader.read_i32()?,
            tile_right: reader.read_i32()?,
        });
    }

    Ok(surfaces)
}
