// this_file: src/assemble.rs

//! Multi-face assembly: drive the per-face loop and build the final [`Font`].
//!
//! Face 0 is loaded first to learn the face count and shared metadata; faces
//! 1..N-1 are then loaded independently. A face that fails to open or extract
//! aborts the whole assembly, since the caller asked for a complete font.

use crate::engine::{FontEngine, FontSource};
use crate::error::Result;
use crate::extract::{extract_face, extract_first_face};
use crate::types::Font;

/// Open face `face_index` of `source`, run `op` on it, and release the face
/// on every exit path. Faces are scoped per call, never per font: face 2 of 5
/// is not kept open while faces 3 and 4 load.
pub fn with_face<'a, E, T>(
    engine: &'a E,
    source: FontSource<'a>,
    face_index: u32,
    op: impl FnOnce(&mut E::Face<'a>) -> Result<T>,
) -> Result<T>
where
    E: FontEngine,
{
    let mut face = engine.open_face(source, face_index)?;
    op(&mut face)
    // face dropped here, releasing the engine's per-face resources
}

/// Rasterize every face of `source` at `pixel_size` and assemble the result.
pub fn assemble<E: FontEngine>(engine: &E, source: FontSource<'_>, pixel_size: u32) -> Result<Font> {
    let (first_face, info) = with_face(engine, source, 0, |face| {
        extract_first_face(face, pixel_size)
    })?;

    let mut faces = Vec::with_capacity(info.num_faces as usize);
    faces.push(first_face);

    for face_index in 1..info.num_faces {
        let face = with_face(engine, source, face_index, |face| {
            extract_face(face, pixel_size)
        })?;
        faces.push(face);
    }

    Ok(Font {
        family: info.family,
        size: pixel_size,
        line_height: info.line_height,
        faces,
    })
}
