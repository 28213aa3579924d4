//! Texture-atlas packing for ground meshes.
//!
//! Ground tiles reference one 256x256 texture each; at render time all
//! of a map's textures live in a single power-of-two atlas. The layout
//! is a pure function of the deduplicated texture count, so it must be
//! computed only after the whole texture table is known. Each cell is
//! 258px wide: the texture plus a one-texel bleed guard on each side,
//! and tile UVs are inset by that texel when remapped into the atlas.

/// Atlas cell footprint in pixels (256px texture + 1px guard per side).
pub const CELL_SIZE: f32 = 258.0;

/// One texel in cell-local UV space.
const TEXEL: f32 = 1.0 / CELL_SIZE;

/// Grid and scale factors for packing `n` textures into one atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasLayout {
    cols: f32,
    rows: f32,
    /// Atlas width in pixels, always a power of two.
    pub width: u32,
    /// Atlas height in pixels, always a power of two.
    pub height: u32,
    /// Slack correction between the packed grid and the padded atlas.
    factor_u: f32,
    factor_v: f32,
}

impl AtlasLayout {
    /// Compute the layout for `texture_count` textures.
    ///
    /// Must be called with the final, deduplicated count: a partial
    /// table yields a smaller grid and every remapped UV lands in the
    /// wrong cell. An empty table is clamped to a 1x1 grid so the
    /// layout math stays finite; no tile references a texture then.
    #[must_use]
    pub fn new(texture_count: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let count = texture_count.max(1) as f32;
        let cols = count.sqrt().round();
        let rows = count.sqrt().ceil();
        let width = (cols * CELL_SIZE).log2().ceil().exp2();
        let height = (rows * CELL_SIZE).log2().ceil().exp2();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (width_px, height_px) = (width as u32, height as u32);
        Self {
            cols,
            rows,
            width: width_px,
            height: height_px,
            factor_u: (cols * CELL_SIZE) / width,
            factor_v: (rows * CELL_SIZE) / height,
        }
    }

    /// Number of cell columns in the packed grid.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cols(&self) -> u32 {
        self.cols as u32
    }

    /// Number of cell rows in the packed grid.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rows(&self) -> u32 {
        self.rows as u32
    }

    /// Remap a cell-local U coordinate in `[0, 1]` into atlas space for
    /// the cell holding texture `texture`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn remap_u(&self, texture: u16, raw: f32) -> f32 {
        let cell = (u32::from(texture) % self.cols()) as f32;
        (cell + raw * (1.0 - 2.0 * TEXEL) + TEXEL) * self.factor_u / self.cols
    }

    /// Remap a cell-local V coordinate in `[0, 1]` into atlas space.
    #[must_use]
    pub fn remap_v(&self, texture: u16, raw: f32) -> f32 {
        let cell = (f32::from(texture) / self.cols).floor();
        (cell + raw * (1.0 - 2.0 * TEXEL) + TEXEL) * self.factor_v / self.rows
    }
}
