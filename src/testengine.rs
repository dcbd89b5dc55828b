// this_file: src/testengine.rs

//! Scripted in-memory engine for deterministic pipeline tests.
//!
//! Faces, declared metadata, code sets and failing codes are all configured
//! up front; open/drop events are recorded so tests can assert the scoped
//! per-face lifetime ordering.

use crate::engine::{EngineFace, FontEngine, FontSource, RenderedGlyph, StyleFlags};
use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

/// Default bitmap dimensions for codes without an explicit size.
const DEFAULT_GLYPH_SIZE: (u32, u32) = (4, 6);

/// Route pipeline diagnostics through env_logger so `RUST_LOG` surfaces
/// them while tests run. Safe to call from every test; only the first call
/// installs the logger.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Script for one mock face.
#[derive(Debug, Clone)]
pub struct FaceSpec {
    family: String,
    codes: Vec<u32>,
    glyph_sizes: HashMap<u32, (u32, u32)>,
    failing_codes: Vec<u32>,
    truncated_codes: Vec<u32>,
    declared_faces: Option<i32>,
    max_advance_height: i32,
    style: StyleFlags,
    reject_pixel_size: bool,
}

impl FaceSpec {
    pub fn new(family: &str) -> Self {
        Self {
            family: family.to_string(),
            codes: Vec::new(),
            glyph_sizes: HashMap::new(),
            failing_codes: Vec::new(),
            truncated_codes: Vec::new(),
            declared_faces: None,
            max_advance_height: 0,
            style: StyleFlags::empty(),
            reject_pixel_size: false,
        }
    }

    /// Defined character codes, in the order enumeration will yield them.
    pub fn with_codes(mut self, codes: Vec<u32>) -> Self {
        self.codes = codes;
        self
    }

    /// Override the bitmap dimensions reported for one code.
    pub fn with_glyph_size(mut self, code: u32, width: u32, height: u32) -> Self {
        self.glyph_sizes.insert(code, (width, height));
        self
    }

    /// Make rendering of one code fail.
    pub fn with_failing_code(mut self, code: u32) -> Self {
        self.failing_codes.push(code);
        self
    }

    /// Make one code deliver fewer coverage bytes than its declared
    /// dimensions, simulating an engine that violates the buffer contract.
    pub fn with_truncated_coverage(mut self, code: u32) -> Self {
        self.truncated_codes.push(code);
        self
    }

    /// Face count the face will declare (defaults to the scripted face count).
    pub fn with_declared_faces(mut self, declared: i32) -> Self {
        self.declared_faces = Some(declared);
        self
    }

    pub fn with_max_advance_height(mut self, height: i32) -> Self {
        self.max_advance_height = height;
        self
    }

    pub fn with_style(mut self, style: StyleFlags) -> Self {
        self.style = style;
        self
    }

    /// Make `set_pixel_size` fail, simulating a face the engine cannot scale.
    pub fn with_pixel_size_rejected(mut self) -> Self {
        self.reject_pixel_size = true;
        self
    }
}

/// Face lifetime event, recorded in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceEvent {
    Opened(u32),
    Dropped(u32),
}

/// Engine whose faces follow their [`FaceSpec`] scripts.
pub struct MockEngine {
    faces: Vec<FaceSpec>,
    events: Rc<RefCell<Vec<FaceEvent>>>,
}

impl MockEngine {
    pub fn new(faces: Vec<FaceSpec>) -> Self {
        Self {
            faces,
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// All open/drop events so far.
    pub fn events(&self) -> Vec<FaceEvent> {
        self.events.borrow().clone()
    }

    /// Number of faces opened so far.
    pub fn opened_face_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, FaceEvent::Opened(_)))
            .count()
    }
}

impl FontEngine for MockEngine {
    type Face<'a> = MockFace<'a>;

    fn open_face<'a>(&'a self, source: FontSource<'a>, face_index: u32) -> Result<Self::Face<'a>> {
        let spec = self
            .faces
            .get(face_index as usize)
            .ok_or_else(|| Error::FaceLoad {
                resource: source.to_string(),
                face_index,
                reason: format!("no such face (resource has {})", self.faces.len()),
            })?
            .clone();

        self.events.borrow_mut().push(FaceEvent::Opened(face_index));
        Ok(MockFace {
            declared_faces: spec.declared_faces.unwrap_or(self.faces.len() as i32),
            spec,
            face_index,
            pixel_size: None,
            scratch: Vec::new(),
            events: Rc::clone(&self.events),
            _source: PhantomData,
        })
    }
}

/// One opened mock face.
#[derive(Debug)]
pub struct MockFace<'a> {
    spec: FaceSpec,
    declared_faces: i32,
    face_index: u32,
    pixel_size: Option<u32>,
    scratch: Vec<u8>,
    events: Rc<RefCell<Vec<FaceEvent>>>,
    _source: PhantomData<&'a ()>,
}

impl MockFace<'_> {
    /// Pixel size the pipeline configured, if any.
    pub fn pixel_size(&self) -> Option<u32> {
        self.pixel_size
    }

    fn glyph_size(&self, code: u32) -> (u32, u32) {
        self.spec
            .glyph_sizes
            .get(&code)
            .copied()
            .unwrap_or(DEFAULT_GLYPH_SIZE)
    }
}

impl EngineFace for MockFace<'_> {
    fn set_pixel_size(&mut self, pixel_size: u32) -> Result<()> {
        if self.spec.reject_pixel_size {
            return Err(Error::FaceLoad {
                resource: "<mock>".to_string(),
                face_index: self.face_index,
                reason: format!("cannot scale face to {} px", pixel_size),
            });
        }
        self.pixel_size = Some(pixel_size);
        Ok(())
    }

    fn family_name(&self) -> String {
        self.spec.family.clone()
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }

    fn num_faces(&self) -> i32 {
        self.declared_faces
    }

    fn max_advance_height(&self) -> i32 {
        self.spec.max_advance_height
    }

    fn style_flags(&self) -> StyleFlags {
        self.spec.style
    }

    fn first_char(&self) -> Option<u32> {
        self.spec.codes.first().copied()
    }

    fn next_char(&self, after: u32) -> Option<u32> {
        let pos = self.spec.codes.iter().position(|&c| c == after)?;
        self.spec.codes.get(pos + 1).copied()
    }

    fn render_glyph(&mut self, char_code: u32) -> Result<RenderedGlyph<'_>> {
        let pixel_size = self.pixel_size.ok_or_else(|| Error::GlyphRender {
            char_code,
            reason: "pixel size not configured".to_string(),
        })?;
        if !self.spec.codes.contains(&char_code) {
            return Err(Error::GlyphRender {
                char_code,
                reason: "char code not defined by face".to_string(),
            });
        }
        if self.spec.failing_codes.contains(&char_code) {
            return Err(Error::GlyphRender {
                char_code,
                reason: "scripted render failure".to_string(),
            });
        }

        let (width, height) = self.glyph_size(char_code);
        self.scratch.clear();
        self.scratch
            .resize((width * height) as usize, (char_code & 0xFF) as u8);
        if self.spec.truncated_codes.contains(&char_code) {
            self.scratch.truncate(self.scratch.len() / 2);
        }

        Ok(RenderedGlyph {
            width,
            height,
            bearing_x: 1,
            bearing_y: height as i32,
            advance: (pixel_size / 2) as i32,
            coverage: &self.scratch,
        })
    }
}

impl Drop for MockFace<'_> {
    fn drop(&mut self) {
        self.events
            .borrow_mut()
            .push(FaceEvent::Dropped(self.face_index));
    }
}
