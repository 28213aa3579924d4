//! World document (`.rsw`) decoding.
//!
//! A world descriptor names its companion files, carries the global
//! water and light parameters, and places every object on the map:
//! static models, point lights, sound emitters, and particle effects.
//! The format went through many in-place revisions; every optional
//! field group is gated on a threshold in [`gate`].

use glam::{IVec3, Vec3, Vec4};

use crate::error::{DecodeError, DecodeResult};
use crate::reader::{ByteReader, TextEncoding};
use crate::version::FormatVersion;

/// Leading tag of every world file.
pub const MAGIC: [u8; 4] = *b"GRSW";

/// Positions and heights are stored in fifths of a world unit.
pub(crate) const UNIT_DIVISOR: f32 = 5.0;

/// Effect trigger delays are stored in tenths of an engine tick.
const DELAY_MULTIPLIER: f32 = 10.0;

/// Version thresholds at which the world format gained fields.
///
/// The whole revision history of the format lives here; decoders only
/// ever compare against these constants.
pub mod gate {
    use crate::version::FormatVersion;

    /// Water level, and per-model name/animation fields.
    pub const WATER_LEVEL: FormatVersion = FormatVersion::new(1, 3);
    pub const MODEL_NAMES: FormatVersion = FormatVersion::new(1, 3);
    /// Fourth companion-file path (scene source).
    pub const SOURCE_FILE: FormatVersion = FormatVersion::new(1, 4);
    /// Light longitude/latitude and diffuse/ambient colors.
    pub const LIGHT_BLOCK: FormatVersion = FormatVersion::new(1, 5);
    pub const GROUND_BOUNDS: FormatVersion = FormatVersion::new(1, 6);
    pub const LIGHT_OPACITY: FormatVersion = FormatVersion::new(1, 7);
    /// Water type, wave height/speed/pitch.
    pub const WATER_WAVES: FormatVersion = FormatVersion::new(1, 8);
    pub const WATER_ANIM_SPEED: FormatVersion = FormatVersion::new(1, 9);
    pub const SOUND_CYCLE: FormatVersion = FormatVersion::new(2, 0);
}

/// Companion file paths named by the world descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldFiles {
    /// Configuration file (unused by modern clients, kept verbatim).
    pub ini: String,
    /// Ground mesh file.
    pub gnd: String,
    /// Altitude/collision file.
    pub gat: String,
    /// Scene source file, present from version 1.4.
    pub src: String,
}

/// Global water parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterSettings {
    pub level: f32,
    pub kind: i32,
    pub wave_height: f32,
    pub wave_speed: f32,
    pub wave_pitch: f32,
    pub anim_speed: i32,
    /// Animation frame image names; not stored in the file itself,
    /// resolved by the renderer from `kind`.
    pub images: Vec<String>,
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            level: 0.0,
            kind: 0,
            wave_height: 0.2,
            wave_speed: 2.0,
            wave_pitch: 50.0,
            anim_speed: 3,
            images: Vec::new(),
        }
    }
}

/// Global directional-light parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSettings {
    pub longitude: i32,
    pub latitude: i32,
    pub diffuse: Vec3,
    pub ambient: Vec3,
    pub opacity: f32,
    pub direction: Vec3,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            longitude: 45,
            latitude: 45,
            diffuse: Vec3::ONE,
            ambient: Vec3::splat(0.3),
            opacity: 1.0,
            direction: Vec3::ZERO,
        }
    }
}

/// Signed ground extent of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundBounds {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Default for GroundBounds {
    fn default() -> Self {
        Self {
            top: -500,
            bottom: 500,
            left: -500,
            right: 500,
        }
    }
}

/// A placed static model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstance {
    pub name: String,
    pub anim_kind: i32,
    pub anim_speed: f32,
    pub block_kind: i32,
    pub filename: String,
    pub node_name: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

/// A placed point light.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub name: String,
    pub position: Vec3,
    pub color: IVec3,
    pub range: f32,
}

/// A placed ambient sound emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEmitter {
    pub name: String,
    pub file: String,
    pub position: Vec3,
    pub volume: f32,
    pub width: i32,
    pub height: i32,
    pub range: f32,
    pub cycle: f32,
}

/// A placed particle effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectEmitter {
    pub name: String,
    pub position: Vec3,
    pub id: i32,
    pub delay: f32,
    pub params: Vec4,
}

/// One object record, discriminated by the 4-byte type tag that
/// precedes it in the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldObject {
    Model(ModelInstance),
    Light(PointLight),
    Sound(SoundEmitter),
    Effect(EffectEmitter),
}

/// A fully decoded world descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldDocument {
    pub version: FormatVersion,
    pub files: WorldFiles,
    pub water: WaterSettings,
    pub light: LightSettings,
    pub ground: GroundBounds,
    pub models: Vec<ModelInstance>,
    pub lights: Vec<PointLight>,
    pub sounds: Vec<SoundEmitter>,
    pub effects: Vec<EffectEmitter>,
}

/// Decode a world descriptor from raw file bytes.
pub fn decode_world(data: &[u8]) -> DecodeResult<WorldDocument> {
    let mut reader = ByteReader::new(data);
    reader.expect_magic(MAGIC)?;
    let version = FormatVersion::read(&mut reader)?;

    let files = WorldFiles {
        ini: reader.read_fixed_str(40, TextEncoding::Ascii)?,
        gnd: reader.read_fixed_str(40, TextEncoding::Ascii)?,
        gat: reader.read_fixed_str(40, TextEncoding::Ascii)?,
        src: if version >= gate::SOURCE_FILE {
            reader.read_fixed_str(40, TextEncoding::Ascii)?
        } else {
            String::new()
        },
    };

    let mut water = WaterSettings::default();
    if version >= gate::WATER_LEVEL {
        water.level = reader.read_f32()? / UNIT_DIVISOR;
        if version >= gate::WATER_WAVES {
            water.kind = reader.read_i32()?;
            water.wave_height = reader.read_f32()? / UNIT_DIVISOR;
            water.wave_speed = reader.read_f32()?;
            water.wave_pitch = reader.read_f32()?;
            if version >= gate::WATER_ANIM_SPEED {
                water.anim_speed = reader.read_i32()?;
            }
        }
    }

    let mut light = LightSettings::default();
    if version >= gate::LIGHT_BLOCK {
        light.longitude = reader.read_i32()?;
        light.latitude = reader.read_i32()?;
        light.diffuse = read_vec3(&mut reader)?;
        light.ambient = read_vec3(&mut reader)?;
        if version >= gate::LIGHT_OPACITY {
            light.opacity = reader.read_f32()?;
        }
    }

    let mut ground = GroundBounds::default();
    if version >= gate::GROUND_BOUNDS {
        ground.top = reader.read_i32()?;
        ground.bottom = reader.read_i32()?;
        ground.left = reader.read_i32()?;
        ground.right = reader.read_i32()?;
    }

    let count = reader.read_i32()?;
    let mut models = Vec::new();
    let mut lights = Vec::new();
    let mut sounds = Vec::new();
    let mut effects = Vec::new();
    for _ in 0..count {
        match WorldObject::read(&mut reader, version)? {
            WorldObject::Model(model) => models.push(model),
            WorldObject::Light(point) => lights.push(point),
            WorldObject::Sound(sound) => sounds.push(sound),
            WorldObject::Effect(effect) => effects.push(effect),
        }
    }

    Ok(WorldDocument {
        version,
        files,
        water,
        light,
        ground,
        models,
        lights,
        sounds,
        effects,
    })
}

impl WorldObject {
    /// Read one tagged object record.
    fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> DecodeResult<Self> {
        let tag_offset = reader.offset();
        let tag = reader.read_i32()?;
        match tag {
            1 => Ok(Self::Model(read_model(reader, version)?)),
            2 => Ok(Self::Light(read_point_light(reader)?)),
            3 => Ok(Self::Sound(read_sound(reader, version)?)),
            4 => Ok(Self::Effect(read_effect(reader)?)),
            tag => Err(DecodeError::UnknownObjectType {
                tag,
                offset: tag_offset,
            }),
        }
    }
}

fn read_model(reader: &mut ByteReader<'_>, version: FormatVersion) -> DecodeResult<ModelInstance> {
    let named = version >= gate::MODEL_NAMES;
    Ok(ModelInstance {
        name: if named {
            reader.read_fixed_str(40, TextEncoding::KoreanEuc)?
        } else {
            String::new()
        },
        anim_kind: if named { reader.read_i32()? } else { 0 },
        anim_speed: if named { reader.read_f32()? } else { 0.0 },
        block_kind: if named { reader.read_i32()? } else { 0 },
        filename: reader.read_fixed_str(80, TextEncoding::KoreanEuc)?,
        node_name: reader.read_fixed_str(80, TextEncoding::Ascii)?,
        position: read_scaled_vec3(reader)?,
        rotation: read_vec3(reader)?,
        scale: read_scaled_vec3(reader)?,
    })
}

fn read_point_light(reader: &mut ByteReader<'_>) -> DecodeResult<PointLight> {
    Ok(PointLight {
        name: reader.read_fixed_str(80, TextEncoding::Ascii)?,
        position: read_scaled_vec3(reader)?,
        color: IVec3::new(reader.read_i32()?, reader.read_i32()?, reader.read_i32()?),
        range: reader.read_f32()?,
    })
}

fn read_sound(reader: &mut ByteReader<'_>, version: FormatVersion) -> DecodeResult<SoundEmitter> {
    Ok(SoundEmitter {
        name: reader.read_fixed_str(80, TextEncoding::Ascii)?,
        file: reader.read_fixed_str(80, TextEncoding::Ascii)?,
        position: read_scaled_vec3(reader)?,
        volume: reader.read_f32()?,
        width: reader.read_i32()?,
        height: reader.read_i32()?,
        range: reader.read_f32()?,
        cycle: if version >= gate::SOUND_CYCLE {
            reader.read_f32()?
        } else {
            0.0
        },
    })
}

fn read_effect(reader: &mut ByteReader<'_>) -> DecodeResult<EffectEmitter> {
    Ok(EffectEmitter {
        name: reader.read_fixed_str(80, TextEncoding::Ascii)?,
        position: read_scaled_vec3(reader)?,
        id: reader.read_i32()?,
        delay: reader.read_f32()? * DELAY_MULTIPLIER,
        params: Vec4::new(
            reader.read_f32()?,
            reader.read_f32()?,
            reader.read_f32()?,
            reader.read_f32()?,
        ),
    })
}

fn read_vec3(reader: &mut ByteReader<'_>) -> DecodeResult<Vec3> {
    Ok(Vec3::new(
        reader.read_f32()?,
        reader.read_f32()?,
        reader.read_f32()?,
    ))
}

/// Read a position-like triple, converting each component out of the
/// stored fifth-unit scale as it is read.
pub(crate) fn read_scaled_vec3(reader: &mut ByteReader<'_>) -> DecodeResult<Vec3> {
    Ok(Vec3::new(
        reader.read_f32()? / UNIT_DIVISOR,
        reader.read_f32()? / UNIT_DIVISOR,
        reader.read_f32()? / UNIT_DIVISOR,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Incremental little-endian buffer builder for test fixtures.
    struct Buf(Vec<u8>);

    impl Buf {
        fn world(major: u8, minor: u8) -> Self {
            let mut buf = Buf(MAGIC.to_vec());
            buf.0.push(major);
            buf.0.push(minor);
            buf
        }

        fn f32(mut self, value: f32) -> Self {
            self.0.extend_from_slice(&value.to_le_bytes());
            self
        }

        fn i32(mut self, value: i32) -> Self {
            self.0.extend_from_slice(&value.to_le_bytes());
            self
        }

        fn str(mut self, value: &str, width: usize) -> Self {
            let mut bytes = value.as_bytes().to_vec();
            bytes.resize(width, 0);
            self.0.extend_from_slice(&bytes);
            self
        }
    }

    fn minimal_world(major: u8, minor: u8) -> Buf {
        Buf::world(major, minor)
            .str("map.ini", 40)
            .str("map.gnd", 40)
            .str("map.gat", 40)
    }

    #[test]
    fn minimal_modern_world_decodes_with_defaults() {
        let buf = minimal_world(3, 0)
            .str("map.rsw", 40) // source file, >= 1.4
            .f32(0.0) // water level
            .i32(0)
            .f32(0.0)
            .f32(0.0)
            .f32(0.0) // water waves
            .i32(3) // anim speed
            .i32(45)
            .i32(45) // light angles
            .f32(1.0)
            .f32(1.0)
            .f32(1.0) // diffuse
            .f32(0.3)
            .f32(0.3)
            .f32(0.3) // ambient
            .f32(1.0) // opacity
            .i32(-500)
            .i32(500)
            .i32(-500)
            .i32(500) // bounds
            .i32(0); // object count

        let doc = decode_world(&buf.0).unwrap();
        assert_eq!(doc.version, FormatVersion::new(3, 0));
        assert_eq!(doc.files.gnd, "map.gnd");
        assert_eq!(doc.ground, GroundBounds::default());
        assert!(doc.models.is_empty());
        assert!(doc.lights.is_empty());
        assert!(doc.sounds.is_empty());
        assert!(doc.effects.is_empty());
    }

    #[test]
    fn pre_water_version_keeps_documented_defaults() {
        // 1.2: no source file, no water, no light, no bounds.
        let buf = minimal_world(1, 2).i32(0);
        let doc = decode_world(&buf.0).unwrap();
        assert_eq!(doc.files.src, "");
        assert!((doc.water.level - 0.0).abs() < f32::EPSILON);
        assert!((doc.water.wave_height - 0.2).abs() < f32::EPSILON);
        assert_eq!(doc.water.anim_speed, 3);
        assert_eq!(doc.light, LightSettings::default());
        assert_eq!(doc.ground, GroundBounds::default());
    }

    #[test]
    fn water_level_is_divided_by_five() {
        // 1.3 reads only the water level before the object count.
        let buf = minimal_world(1, 3).f32(25.0).i32(0);
        let doc = decode_world(&buf.0).unwrap();
        assert!((doc.water.level - 5.0).abs() < f32::EPSILON);
        assert_eq!(doc.water.kind, 0);
    }

    #[test]
    fn invalid_magic_is_fatal() {
        let mut data = minimal_world(1, 2).i32(0).0;
        data[..4].copy_from_slice(b"GRGN");
        assert_eq!(
            decode_world(&data).unwrap_err(),
            DecodeError::InvalidMagic {
                expected: *b"GRSW",
                found: *b"GRGN",
            }
        );
    }

    #[test]
    fn truncation_anywhere_fails_without_partial_document() {
        let full = minimal_world(1, 3).f32(25.0).i32(0).0;
        for end in 0..full.len() {
            assert!(
                matches!(
                    decode_world(&full[..end]),
                    Err(DecodeError::UnexpectedEndOfData { .. })
                ),
                "no failure when truncated to {end} bytes"
            );
        }
    }

    fn effect_record(buf: Buf) -> Buf {
        buf.i32(4)
            .str("torch#1", 80)
            .f32(50.0)
            .f32(-10.0)
            .f32(35.0) // position
            .i32(17) // effect id
            .f32(2.0) // delay
            .f32(1.0)
            .f32(2.0)
            .f32(3.0)
            .f32(4.0) // params
    }

    #[test]
    fn effect_scaling_and_params() {
        let buf = effect_record(minimal_world(1, 2).i32(1));
        let doc = decode_world(&buf.0).unwrap();
        let effect = &doc.effects[0];
        assert_eq!(effect.name, "torch#1");
        assert_eq!(effect.position, Vec3::new(10.0, -2.0, 7.0));
        assert_eq!(effect.id, 17);
        assert!((effect.delay - 20.0).abs() < f32::EPSILON);
        assert_eq!(effect.params, Vec4::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn model_record_with_gated_names() {
        let buf = minimal_world(1, 3)
            .f32(0.0) // water level
            .i32(1) // object count
            .i32(1) // model tag
            .str("prontera_tree", 40)
            .i32(0) // anim kind
            .f32(1.0) // anim speed
            .i32(0) // block kind
            .str("data\\model\\tree.rsm", 80)
            .str("root", 80)
            .f32(5.0)
            .f32(10.0)
            .f32(15.0) // position
            .f32(0.0)
            .f32(90.0)
            .f32(0.0) // rotation
            .f32(5.0)
            .f32(5.0)
            .f32(5.0); // scale

        let doc = decode_world(&buf.0).unwrap();
        let model = &doc.models[0];
        assert_eq!(model.name, "prontera_tree");
        assert_eq!(model.filename, "data\\model\\tree.rsm");
        assert_eq!(model.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(model.rotation, Vec3::new(0.0, 90.0, 0.0));
        assert_eq!(model.scale, Vec3::ONE);
    }

    #[test]
    fn sound_cycle_defaults_before_two_zero() {
        let sound = |buf: Buf| {
            buf.i32(3)
                .str("amb", 80)
                .str("wind.wav", 80)
                .f32(0.0)
                .f32(0.0)
                .f32(0.0)
                .f32(0.5) // volume
                .i32(1)
                .i32(1)
                .f32(100.0)
        };
        // 1.2: no cycle field on disk.
        let old = sound(minimal_world(1, 2).i32(1));
        assert!((decode_world(&old.0).unwrap().sounds[0].cycle - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn point_light_record() {
        let buf = minimal_world(1, 2)
            .i32(1)
            .i32(2)
            .str("glow", 80)
            .f32(10.0)
            .f32(20.0)
            .f32(30.0)
            .i32(255)
            .i32(128)
            .i32(0)
            .f32(80.0);
        let doc = decode_world(&buf.0).unwrap();
        let light = &doc.lights[0];
        assert_eq!(light.position, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(light.color, IVec3::new(255, 128, 0));
        assert!((light.range - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_object_tag_fails_hard() {
        let buf = minimal_world(1, 2).i32(1).i32(9);
        let err = decode_world(&buf.0).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownObjectType { tag: 9, .. }));
    }
}
