// this_file: src/engine.rs

//! The engine seam: traits the extraction pipeline consumes.
//!
//! A [`FontEngine`] opens faces from a path or from caller-owned bytes; an
//! [`EngineFace`] exposes the metadata, enumeration and rendering primitives
//! the pipeline needs. The pipeline itself is engine-generic; the crate ships
//! [`crate::raster::ZenoEngine`] as the default implementation.

use crate::error::Result;
use std::fmt;
use std::ops::BitOr;
use std::path::Path;

/// A font resource to open a face from.
///
/// The memory form borrows the caller's bytes for the duration of the face's
/// lifetime; ownership is never transferred to the engine.
#[derive(Debug, Clone, Copy)]
pub enum FontSource<'a> {
    /// Filesystem path to a font file
    Path(&'a Path),
    /// Raw font bytes already in memory
    Memory(&'a [u8]),
}

impl fmt::Display for FontSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::Path(path) => write!(f, "'{}'", path.display()),
            FontSource::Memory(bytes) => write!(f, "<{} bytes in memory>", bytes.len()),
        }
    }
}

/// Face style-flag bitmask with the bold and italic bits the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleFlags(u16);

impl StyleFlags {
    pub const BOLD: StyleFlags = StyleFlags(0x01);
    pub const ITALIC: StyleFlags = StyleFlags(0x02);

    /// No style bits set.
    pub fn empty() -> Self {
        StyleFlags(0)
    }

    /// Whether every bit of `other` is set in `self`.
    pub fn contains(self, other: StyleFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for StyleFlags {
    type Output = StyleFlags;

    fn bitor(self, rhs: StyleFlags) -> StyleFlags {
        StyleFlags(self.0 | rhs.0)
    }
}

/// One rendered glyph, borrowing the face's scratch buffer.
///
/// `coverage` is only valid until the next `render_glyph` call on the same
/// face; the `&mut` receiver of [`EngineFace::render_glyph`] makes the borrow
/// checker enforce that callers copy the bytes out first.
#[derive(Debug)]
pub struct RenderedGlyph<'a> {
    pub width: u32,
    pub height: u32,
    pub bearing_x: i32,
    pub bearing_y: i32,
    pub advance: i32,
    /// `width * height` single-channel coverage samples, row-major
    pub coverage: &'a [u8],
}

/// A rasterization engine capable of opening faces from a resource.
///
/// One engine value corresponds to one native context; it is not safe to
/// share across concurrent extraction calls without external serialization.
pub trait FontEngine {
    type Face<'a>: EngineFace
    where
        Self: 'a;

    /// Open face `face_index` of `source`.
    ///
    /// Fails with [`crate::Error::FaceLoad`] when the resource cannot be read
    /// or the engine rejects it. Dropping the returned face releases every
    /// native resource it holds.
    fn open_face<'a>(&'a self, source: FontSource<'a>, face_index: u32) -> Result<Self::Face<'a>>;
}

/// An opened font face.
pub trait EngineFace {
    /// Set the vertical pixel size for subsequent rendering; the horizontal
    /// size is derived proportionally.
    fn set_pixel_size(&mut self, pixel_size: u32) -> Result<()>;

    /// Family name as declared by the face, empty when undeclared.
    fn family_name(&self) -> String;

    /// Ordinal of this face within its resource.
    fn face_index(&self) -> u32;

    /// Face count as declared by the resource. May be reported as less than 1
    /// by a misbehaving resource; callers must correct.
    fn num_faces(&self) -> i32;

    /// Maximum line-advance height as declared by the face, in the face's
    /// units. Non-positive when the face declares no vertical metrics.
    fn max_advance_height(&self) -> i32;

    /// Style-flag bitmask of this face.
    fn style_flags(&self) -> StyleFlags;

    /// First defined character code, or `None` for an empty charmap.
    fn first_char(&self) -> Option<u32>;

    /// Next defined character code after `after`, or `None` at exhaustion.
    fn next_char(&self, after: u32) -> Option<u32>;

    /// Load and rasterize the glyph for `char_code` at the configured pixel
    /// size. The returned coverage buffer is owned by the face and reused by
    /// the next render call.
    fn render_glyph(&mut self, char_code: u32) -> Result<RenderedGlyph<'_>>;

    /// Iterate every defined character code in engine enumeration order.
    fn char_codes(&self) -> CharCodes<'_, Self>
    where
        Self: Sized,
    {
        CharCodes {
            face: self,
            cursor: None,
            started: false,
        }
    }
}

/// Lazy iterator over a face's defined character codes.
///
/// Wraps the first/next enumeration primitives; finite, non-restartable,
/// scoped to one face. Each defined code is yielded at most once, in the
/// engine's enumeration order.
pub struct CharCodes<'a, F: EngineFace> {
    face: &'a F,
    cursor: Option<u32>,
    started: bool,
}

impl<F: EngineFace> Iterator for CharCodes<'_, F> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.cursor = if !self.started {
            self.started = true;
            self.face.first_char()
        } else {
            self.face.next_char(self.cursor?)
        };
        self.cursor
    }
}
