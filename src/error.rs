// this_file: src/error.rs

//! Error types for glyphbake.
//!
//! Three failure classes exist: engine initialization failures (fatal to the
//! font subsystem), face load failures (fatal to the enclosing load call) and
//! glyph render failures (recovered inside the extractor, never surfaced to
//! the caller).

use thiserror::Error;

/// Main error type for glyphbake operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The native rasterization engine could not be brought up
    #[error("Failed to initialize the font engine: {reason}")]
    Initialization { reason: String },

    /// A specific face could not be opened or decoded
    #[error("Failed to load face {face_index} of font {resource}: {reason}")]
    FaceLoad {
        resource: String,
        face_index: u32,
        reason: String,
    },

    /// A single character code could not be rasterized.
    ///
    /// Engines produce this from `render_glyph`; the extractor logs it and
    /// skips the code, so it never aborts a load call.
    #[error("Failed to render glyph for char code U+{char_code:04X}: {reason}")]
    GlyphRender { char_code: u32, reason: String },
}

/// Specialized Result type for glyphbake operations.
pub type Result<T> = std::result::Result<T, Error>;
