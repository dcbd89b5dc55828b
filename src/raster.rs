// this_file: src/raster.rs

//! Default [`FontEngine`] built on the fontations ecosystem.
//!
//! Parsing and metadata come from `read-fonts`/`skrifa`, coverage masks from
//! `zeno`. Path resources are memory-mapped with `memmap2`; memory resources
//! borrow the caller's bytes without copying.

use crate::engine::{EngineFace, FontEngine, FontSource, RenderedGlyph, StyleFlags};
use crate::error::{Error, Result};
use memmap2::Mmap;
use read_fonts::{FileRef, FontRef, TableProvider};
use skrifa::attribute::Style;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::string::StringId;
use skrifa::{GlyphId, MetadataProvider};
use std::collections::HashMap;
use std::fs::File;
use std::sync::Arc;
use zeno::{Command, Mask};

/// Pure-Rust rasterization engine.
///
/// One engine per worker; a single engine must not be shared by concurrent
/// extraction calls without external serialization.
pub struct ZenoEngine;

impl ZenoEngine {
    /// Initialize the engine context.
    ///
    /// The pure-Rust stack has no native context that can fail to come up,
    /// but the initialization contract is kept so callers handle engines that
    /// do (and so alternative engines can slot in behind the same facade).
    pub fn new() -> Result<Self> {
        Ok(Self)
    }
}

impl FontEngine for ZenoEngine {
    type Face<'a> = ZenoFace<'a>;

    fn open_face<'a>(&'a self, source: FontSource<'a>, face_index: u32) -> Result<Self::Face<'a>> {
        let face_load = |reason: String| Error::FaceLoad {
            resource: source.to_string(),
            face_index,
            reason,
        };

        match source {
            FontSource::Path(path) => {
                let file = File::open(path).map_err(|e| face_load(e.to_string()))?;
                let mapping =
                    Arc::new(unsafe { Mmap::map(&file).map_err(|e| face_load(e.to_string()))? });
                // The mapping is kept alive by the face for as long as the
                // view exists.
                let data: &'static [u8] =
                    unsafe { std::slice::from_raw_parts(mapping.as_ptr(), mapping.len()) };
                ZenoFace::parse(data, Some(mapping), source, face_index)
            }
            FontSource::Memory(bytes) => {
                if bytes.is_empty() {
                    return Err(face_load("font data is empty".to_string()));
                }
                ZenoFace::parse(bytes, None, source, face_index)
            }
        }
    }
}

/// One parsed face with its charmap snapshot and render scratch buffer.
pub struct ZenoFace<'a> {
    // Keeps the path-backed view in `font` alive; None for memory resources.
    _mapping: Option<Arc<Mmap>>,
    font: FontRef<'a>,
    source: String,
    face_index: u32,
    num_faces: i32,
    family: String,
    style: StyleFlags,
    max_advance_height: i32,
    /// (char code, glyph id) in cmap enumeration order, sentinel glyph 0 excluded
    charmap: Vec<(u32, GlyphId)>,
    positions: HashMap<u32, usize>,
    pixel_size: Option<u32>,
    scratch: RenderScratch,
}

impl std::fmt::Debug for ZenoFace<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZenoFace")
            .field("source", &self.source)
            .field("face_index", &self.face_index)
            .field("num_faces", &self.num_faces)
            .field("family", &self.family)
            .field("style", &self.style)
            .field("max_advance_height", &self.max_advance_height)
            .field("pixel_size", &self.pixel_size)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct RenderScratch {
    width: u32,
    height: u32,
    bearing_x: i32,
    bearing_y: i32,
    advance: i32,
    coverage: Vec<u8>,
}

impl<'a> ZenoFace<'a> {
    fn parse(
        data: &'a [u8],
        mapping: Option<Arc<Mmap>>,
        source: FontSource<'_>,
        face_index: u32,
    ) -> Result<Self> {
        let face_load = |reason: String| Error::FaceLoad {
            resource: source.to_string(),
            face_index,
            reason,
        };

        let file_ref =
            FileRef::new(data).map_err(|e| face_load(format!("unsupported font data: {}", e)))?;

        let (font, num_faces) = match file_ref {
            FileRef::Font(font) => {
                if face_index != 0 {
                    return Err(face_load("single font resource has only face 0".to_string()));
                }
                (font, 1)
            }
            FileRef::Collection(collection) => {
                let len = collection.len();
                let font = collection
                    .get(face_index)
                    .map_err(|e| face_load(format!("face not present in collection: {}", e)))?;
                (font, len as i32)
            }
        };

        let family = font
            .localized_strings(StringId::FAMILY_NAME)
            .english_or_first()
            .map(|name| name.chars().collect())
            .unwrap_or_default();

        // skrifa derives these from OS/2 fsSelection and head.macStyle, the
        // same declared bits FreeType surfaces as style flags.
        let attributes = font.attributes();
        let mut style = StyleFlags::empty();
        if attributes.weight.value() >= 700.0 {
            style = style | StyleFlags::BOLD;
        }
        if !matches!(attributes.style, Style::Normal) {
            style = style | StyleFlags::ITALIC;
        }

        // Vertical metrics are optional; report 0 so callers apply their
        // pixel-size fallback, as FreeType does for fonts without vhea.
        let max_advance_height = font
            .vhea()
            .map(|vhea| vhea.advance_height_max().to_u16() as i32)
            .unwrap_or(0);

        let charmap: Vec<(u32, GlyphId)> = font
            .charmap()
            .mappings()
            .filter(|(_, glyph_id)| glyph_id.to_u32() != 0)
            .collect();
        let positions = charmap
            .iter()
            .enumerate()
            .map(|(position, (code, _))| (*code, position))
            .collect();

        Ok(Self {
            _mapping: mapping,
            font,
            source: source.to_string(),
            face_index,
            num_faces,
            family,
            style,
            max_advance_height,
            charmap,
            positions,
            pixel_size: None,
            scratch: RenderScratch::default(),
        })
    }

    fn glyph_id(&self, char_code: u32) -> Result<GlyphId> {
        self.positions
            .get(&char_code)
            .map(|&position| self.charmap[position].1)
            .ok_or_else(|| Error::GlyphRender {
                char_code,
                reason: "char code not defined by face".to_string(),
            })
    }
}

impl EngineFace for ZenoFace<'_> {
    fn set_pixel_size(&mut self, pixel_size: u32) -> Result<()> {
        if pixel_size == 0 {
            return Err(Error::FaceLoad {
                resource: self.source.clone(),
                face_index: self.face_index,
                reason: "pixel size must be positive".to_string(),
            });
        }
        self.pixel_size = Some(pixel_size);
        Ok(())
    }

    fn family_name(&self) -> String {
        self.family.clone()
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }

    fn num_faces(&self) -> i32 {
        self.num_faces
    }

    fn max_advance_height(&self) -> i32 {
        self.max_advance_height
    }

    fn style_flags(&self) -> StyleFlags {
        self.style
    }

    fn first_char(&self) -> Option<u32> {
        self.charmap.first().map(|(code, _)| *code)
    }

    fn next_char(&self, after: u32) -> Option<u32> {
        let position = self.positions.get(&after)?;
        self.charmap.get(position + 1).map(|(code, _)| *code)
    }

    fn render_glyph(&mut self, char_code: u32) -> Result<RenderedGlyph<'_>> {
        let pixel_size = self.pixel_size.ok_or_else(|| Error::GlyphRender {
            char_code,
            reason: "pixel size not configured".to_string(),
        })?;
        let glyph_id = self.glyph_id(char_code)?;
        let size = Size::new(pixel_size as f32);

        let outlines = self.font.outline_glyphs();
        let outline = outlines.get(glyph_id).ok_or_else(|| Error::GlyphRender {
            char_code,
            reason: "no outline for glyph".to_string(),
        })?;

        let mut commands = Vec::new();
        let mut pen = ZenoPen::new(&mut commands);
        outline
            .draw(DrawSettings::unhinted(size, LocationRef::default()), &mut pen)
            .map_err(|e| Error::GlyphRender {
                char_code,
                reason: format!("failed to draw outline: {}", e),
            })?;

        let (coverage, placement) = Mask::new(commands.as_slice()).render();

        let advance = self
            .font
            .glyph_metrics(size, LocationRef::default())
            .advance_width(glyph_id)
            .unwrap_or(0.0)
            .round() as i32;

        self.scratch = RenderScratch {
            width: placement.width,
            height: placement.height,
            bearing_x: placement.left,
            // The pen emits y-down commands, so the placement's top edge is
            // the negated distance above the baseline.
            bearing_y: -placement.top,
            advance,
            coverage,
        };

        Ok(RenderedGlyph {
            width: self.scratch.width,
            height: self.scratch.height,
            bearing_x: self.scratch.bearing_x,
            bearing_y: self.scratch.bearing_y,
            advance: self.scratch.advance,
            coverage: &self.scratch.coverage,
        })
    }
}

/// Adapter converting skrifa outline callbacks into a zeno command vector,
/// flipping Y for raster coordinates.
struct ZenoPen<'a> {
    commands: &'a mut Vec<Command>,
}

impl<'a> ZenoPen<'a> {
    fn new(commands: &'a mut Vec<Command>) -> Self {
        Self { commands }
    }
}

impl OutlinePen for ZenoPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(Command::MoveTo([x, -y].into()));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(Command::LineTo([x, -y].into()));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.commands
            .push(Command::QuadTo([cx0, -cy0].into(), [x, -y].into()));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.commands.push(Command::CurveTo(
            [cx0, -cy0].into(),
            [cx1, -cy1].into(),
            [x, -y].into(),
        ));
    }

    fn close(&mut self) {
        self.commands.push(Command::Close);
    }
}
