//! Surface spec and raster asset store.
//!
//! The two system objects — garment mockup and print-area boundary — plus
//! the canvas background are plain data here, not document objects. Export
//! captures derive throwaway specs (`for_preview`, `for_print`) instead of
//! toggling flags on the live spec, so capture-time cosmetics can never be
//! persisted by accident.

use pod_core::{Color, Rect, SourceRef, StudioConfig};
use std::collections::HashMap;
use tiny_skia::Pixmap;

/// Everything the rasterizer needs to know about the working surface that
/// is not part of the side's document.
#[derive(Debug, Clone)]
pub struct SurfaceSpec {
    pub width: u32,
    pub height: u32,
    /// `None` renders on a transparent background.
    pub background: Option<Color>,
    pub print_area: Rect,
    /// The active side's garment mockup, swapped on side switch.
    pub mockup: Option<SourceRef>,
    pub mockup_visible: bool,
    pub boundary_visible: bool,
    pub boundary_color: Color,
}

impl SurfaceSpec {
    pub fn from_config(config: &StudioConfig) -> Self {
        Self {
            width: config.surface_width,
            height: config.surface_height,
            background: Some(Color::WHITE),
            print_area: config.print_area,
            mockup: None,
            mockup_visible: true,
            boundary_visible: true,
            boundary_color: Color::rgba(0.35, 0.35, 0.35, 1.0),
        }
    }

    /// Capture spec for the preview artifact: full scene, opaque background,
    /// boundary hidden.
    pub fn for_preview(&self) -> Self {
        Self {
            background: Some(self.background.unwrap_or(Color::WHITE)),
            boundary_visible: false,
            mockup_visible: true,
            ..self.clone()
        }
    }

    /// Capture spec for the print artifact: design only, transparent
    /// background, no mockup, no boundary.
    pub fn for_print(&self) -> Self {
        Self {
            background: None,
            boundary_visible: false,
            mockup_visible: false,
            ..self.clone()
        }
    }

    pub fn full_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }
}

/// Decoded image pixels keyed by source reference.
///
/// Populated by the asset side (resolver loads + decodes, then inserts);
/// consumed by the painter. An absent entry renders as a skip + warning,
/// never an error.
#[derive(Debug, Default)]
pub struct RasterStore {
    pixmaps: HashMap<SourceRef, Pixmap>,
}

impl RasterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert straight (non-premultiplied) RGBA8 pixels.
    /// Returns false if the dimensions don't match the buffer.
    pub fn insert_rgba(&mut self, source: SourceRef, width: u32, height: u32, rgba: &[u8]) -> bool {
        if width == 0 || height == 0 || rgba.len() != (width * height * 4) as usize {
            log::warn!("rejecting malformed raster for {:?}", source.as_str());
            return false;
        }
        let Some(mut pixmap) = Pixmap::new(width, height) else {
            return false;
        };
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
            *dst = tiny_skia::ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        self.pixmaps.insert(source, pixmap);
        true
    }

    pub fn get(&self, source: &SourceRef) -> Option<&Pixmap> {
        self.pixmaps.get(source)
    }

    pub fn contains(&self, source: &SourceRef) -> bool {
        self.pixmaps.contains_key(source)
    }
}
