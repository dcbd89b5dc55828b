// this_file: src/extract.rs

//! Glyph extraction: turn one opened face into a fully rasterized [`FontFace`].
//!
//! Enumeration and rendering are interleaved per character code; a code that
//! fails to render is logged and skipped without aborting the face. Coverage
//! bytes are copied out of the engine's scratch buffer immediately, since that
//! buffer is reused by the next render call.

use crate::engine::{EngineFace, StyleFlags};
use crate::error::Result;
use crate::types::{FontFace, Glyph};
use log::{debug, warn};

/// First-face metadata, corrected and carried by value into the loop that
/// loads the remaining faces. Never recomputed from faces 1..N-1.
#[derive(Debug, Clone)]
pub struct FontInfo {
    /// Family name declared by face 0
    pub family: String,
    /// Face count, corrected to at least 1
    pub num_faces: u32,
    /// Line-advance height, falling back to the pixel size when the face
    /// declares a non-positive value
    pub line_height: u32,
}

/// Extract face 0, additionally capturing the resource-wide [`FontInfo`].
pub fn extract_first_face<F: EngineFace>(
    face: &mut F,
    pixel_size: u32,
) -> Result<(FontFace, FontInfo)> {
    face.set_pixel_size(pixel_size)?;

    let declared_faces = face.num_faces();
    let declared_height = face.max_advance_height();
    let info = FontInfo {
        family: face.family_name(),
        num_faces: if declared_faces < 1 {
            1
        } else {
            declared_faces as u32
        },
        line_height: if declared_height < 1 {
            pixel_size
        } else {
            declared_height as u32
        },
    };

    let font_face = collect_glyphs(face, &info.family)?;
    Ok((font_face, info))
}

/// Extract a non-first face. Resource-wide metadata is not recomputed.
pub fn extract_face<F: EngineFace>(face: &mut F, pixel_size: u32) -> Result<FontFace> {
    face.set_pixel_size(pixel_size)?;
    let family = face.family_name();
    collect_glyphs(face, &family)
}

fn collect_glyphs<F: EngineFace>(face: &mut F, family: &str) -> Result<FontFace> {
    let face_index = face.face_index();
    // Enumeration is snapshotted up front; rendering mutates the face's
    // scratch buffer and cannot run while the enumeration cursor borrows it.
    let codes: Vec<u32> = face.char_codes().collect();
    let mut glyphs = Vec::with_capacity(codes.len());

    for char_code in codes {
        let rendered = match face.render_glyph(char_code) {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!(
                    "Failed to render glyph with char code U+{:04X} for font family '{}', \
                     face index {}: {}",
                    char_code, family, face_index, err
                );
                continue;
            }
        };

        let image = if rendered.width > 0 && rendered.height > 0 {
            let expected = (rendered.width * rendered.height) as usize;
            // Copy before the next render call invalidates the buffer. An
            // engine delivering fewer bytes than its declared dimensions is
            // treated like any other render failure for this code.
            match rendered.coverage.get(..expected) {
                Some(coverage) => coverage.to_vec(),
                None => {
                    warn!(
                        "Engine returned {} coverage bytes (expected {}) for char code \
                         U+{:04X} for font family '{}', face index {}",
                        rendered.coverage.len(),
                        expected,
                        char_code,
                        family,
                        face_index
                    );
                    continue;
                }
            }
        } else {
            Vec::new()
        };

        glyphs.push(Glyph {
            char_code,
            width: rendered.width,
            height: rendered.height,
            bearing_x: rendered.bearing_x,
            bearing_y: rendered.bearing_y,
            advance: rendered.advance,
            image,
        });
    }

    let style = face.style_flags();
    debug!(
        target: "glyphbake::extract",
        "family='{}' face={} glyphs={} bold={} italic={}",
        family,
        face_index,
        glyphs.len(),
        style.contains(StyleFlags::BOLD),
        style.contains(StyleFlags::ITALIC),
    );

    Ok(FontFace {
        face_index,
        bold: style.contains(StyleFlags::BOLD),
        italic: style.contains(StyleFlags::ITALIC),
        glyphs,
    })
}
