// this_file: src/types.rs

//! The extracted font asset: `Font` owning `FontFace`s owning `Glyph`s.
//!
//! Everything here is plain owned data. The consuming UI layer receives a
//! `Font` and needs no font-format knowledge to use it.

use serde::{Deserialize, Serialize};

/// One rasterized glyph at the requested pixel size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    /// Unicode code point this glyph was rendered for
    pub char_code: u32,
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Horizontal offset from the pen position to the bitmap's left edge
    pub bearing_x: i32,
    /// Vertical offset from the baseline up to the bitmap's top edge
    pub bearing_y: i32,
    /// Horizontal pen advance after drawing this glyph
    pub advance: i32,
    /// Single-channel coverage samples, row-major, top-to-bottom.
    ///
    /// Exactly `width * height` bytes when both dimensions are non-zero,
    /// empty otherwise (e.g. space).
    pub image: Vec<u8>,
}

/// One stylistic variant of a font resource with all of its glyphs rasterized.
///
/// Glyph order is the engine's enumeration order, which is not necessarily
/// ascending by code point. Each defined code appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFace {
    /// Ordinal of this face within the font resource
    pub face_index: u32,
    /// Bold style flag as declared by the face
    pub bold: bool,
    /// Italic style flag as declared by the face
    pub italic: bool,
    /// All rasterized glyphs of this face
    pub glyphs: Vec<Glyph>,
}

impl FontFace {
    /// Look up a glyph by character code.
    pub fn glyph(&self, char_code: u32) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.char_code == char_code)
    }
}

/// A fully rasterized font resource, the root of the extracted asset.
///
/// `family`, `size` and `line_height` are shared across all faces and are
/// sourced from face 0 only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Font {
    /// Human-readable family name of the resource
    pub family: String,
    /// Pixel size every glyph was rasterized at
    pub size: u32,
    /// Corrected line-advance height; falls back to `size` when the
    /// resource declares none
    pub line_height: u32,
    /// Faces in resource order; `faces[i].face_index == i`
    pub faces: Vec<FontFace>,
}

impl Font {
    /// Face by resource ordinal.
    pub fn face(&self, face_index: u32) -> Option<&FontFace> {
        self.faces.get(face_index as usize)
    }
}
