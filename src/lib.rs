// this_file: src/lib.rs

//! Glyphbake: rasterized font asset extraction for UI renderers.
//!
//! Extracts a fully rasterized, self-contained asset (`Font` → `FontFace` →
//! `Glyph`) from a font resource at a requested pixel size, so a UI layer can
//! draw text without parsing font formats itself. Every defined character
//! code of every face is rendered to an owned single-channel coverage bitmap.
//!
//! ## Architecture
//!
//! - **engine**: trait seam to the rasterization engine (open faces,
//!   enumerate codes, render glyphs)
//! - **raster**: default engine built on skrifa + zeno
//! - **extract**: per-face glyph extraction with per-glyph failure recovery
//! - **assemble**: multi-face loop with first-face metadata propagation
//! - **types**: the extracted asset handed to the UI layer
//! - **error**: error types and handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use glyphbake::FontExtractor;
//!
//! let extractor = FontExtractor::new()?;
//! let font = extractor.load_file("fonts/sans.ttf", 16)?;
//! for face in &font.faces {
//!     println!("face {}: {} glyphs", face.face_index, face.glyphs.len());
//! }
//! # Ok::<(), glyphbake::Error>(())
//! ```
//!
//! Extraction is synchronous and blocking; one extractor must not be shared
//! by concurrent calls without external serialization. Use one extractor per
//! worker instead.

pub mod assemble;
pub mod engine;
pub mod error;
pub mod extract;
pub mod raster;
pub mod types;

#[cfg(test)]
pub(crate) mod testengine;

pub use assemble::{assemble, with_face};
pub use engine::{CharCodes, EngineFace, FontEngine, FontSource, RenderedGlyph, StyleFlags};
pub use error::{Error, Result};
pub use extract::{extract_face, extract_first_face, FontInfo};
pub use raster::ZenoEngine;
pub use types::{Font, FontFace, Glyph};

use std::path::Path;

/// Application-facing entry point owning one engine context.
///
/// Each load call performs a fresh extraction; nothing is cached across
/// calls. A failed call leaves the engine usable for the next one.
pub struct FontExtractor<E: FontEngine = ZenoEngine> {
    engine: E,
}

impl FontExtractor<ZenoEngine> {
    /// Create an extractor backed by the default engine.
    ///
    /// Fails with [`Error::Initialization`] when the engine context cannot be
    /// brought up.
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: ZenoEngine::new()?,
        })
    }
}

impl<E: FontEngine> FontExtractor<E> {
    /// Create an extractor backed by a caller-supplied engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// The engine this extractor owns.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Rasterize every face of the font file at `path`.
    pub fn load_file(&self, path: impl AsRef<Path>, pixel_size: u32) -> Result<Font> {
        assemble(&self.engine, FontSource::Path(path.as_ref()), pixel_size)
    }

    /// Rasterize every face of the in-memory font resource `bytes`.
    ///
    /// The bytes are borrowed for the duration of the call only; nothing is
    /// retained afterwards.
    pub fn load_bytes(&self, bytes: &[u8], pixel_size: u32) -> Result<Font> {
        if bytes.is_empty() {
            return Err(Error::FaceLoad {
                resource: "<0 bytes in memory>".to_string(),
                face_index: 0,
                reason: "font data is empty".to_string(),
            });
        }
        assemble(&self.engine, FontSource::Memory(bytes), pixel_size)
    }
}
