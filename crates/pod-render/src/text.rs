//! Text layout and glyph rasterization.
//!
//! Glyphs come from `ab_glyph` when the text's font family has been
//! registered. Unregistered families fall back to deterministic per-char
//! placeholder boxes at the model's estimated metrics, so captures stay
//! non-empty and reproducible on machines without the font installed.
//!
//! A text object is rasterized into its own block pixmap with the object's
//! scale (and the capture's DPI scale) baked in, then composited with
//! rotation/translation only — glyph edges stay crisp at print resolution.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use pod_core::model::{TextAlign, TextPayload};
use smallvec::SmallVec;
use std::collections::HashMap;
use thiserror::Error;
use tiny_skia::Pixmap;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("invalid font data for family \"{0}\"")]
    InvalidData(String),
}

/// Registered fonts by family name.
#[derive(Default)]
pub struct FontStore {
    fonts: HashMap<String, FontArc>,
}

impl FontStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, family: impl Into<String>, bytes: Vec<u8>) -> Result<(), FontError> {
        let family = family.into();
        let font =
            FontArc::try_from_vec(bytes).map_err(|_| FontError::InvalidData(family.clone()))?;
        self.fonts.insert(family, font);
        Ok(())
    }

    pub fn get(&self, family: &str) -> Option<&FontArc> {
        self.fonts.get(family)
    }
}

// ─── Layout ──────────────────────────────────────────────────────────────

struct LineRun {
    text: String,
    /// Advance width at the unscaled font size.
    width: f32,
}

pub(crate) struct BlockLayout {
    lines: SmallVec<[LineRun; 4]>,
    pub width: f32,
    pub height: f32,
    line_height: f32,
}

/// Lay the text out at its unscaled font size.
pub(crate) fn layout_block(payload: &TextPayload, font: Option<&FontArc>) -> BlockLayout {
    let size = payload.font_size_px;
    let line_height = size * payload.line_height;

    let mut lines: SmallVec<[LineRun; 4]> = SmallVec::new();
    let mut width = 0.0f32;
    for text in payload.content.lines() {
        let line_width = match font {
            Some(font) => {
                let scaled = font.as_scaled(PxScale::from(size));
                let advances: f32 = text
                    .chars()
                    .map(|c| scaled.h_advance(font.glyph_id(c)))
                    .sum();
                advances + payload.char_spacing * text.chars().count() as f32
            }
            None => text.chars().count() as f32 * (size * 0.6 + payload.char_spacing),
        };
        width = width.max(line_width);
        lines.push(LineRun {
            text: text.to_string(),
            width: line_width,
        });
    }
    if lines.is_empty() {
        lines.push(LineRun {
            text: String::new(),
            width: 0.0,
        });
    }

    let height = lines.len() as f32 * line_height;
    BlockLayout {
        lines,
        width: width.max(1.0),
        height: height.max(1.0),
        line_height,
    }
}

fn align_offset(align: TextAlign, block_width: f32, line_width: f32) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => (block_width - line_width) / 2.0,
        TextAlign::Right => block_width - line_width,
    }
}

// ─── Rasterization ───────────────────────────────────────────────────────

/// Rasterize the text into a block pixmap with (sx, sy) baked in.
///
/// Returns the pixmap plus the unscaled block size, which the painter uses
/// to center the block on the object transform.
pub(crate) fn rasterize_block(
    payload: &TextPayload,
    fonts: &FontStore,
    sx: f32,
    sy: f32,
) -> Option<(Pixmap, f32, f32)> {
    let font = fonts.get(&payload.font_family);
    if font.is_none() {
        log::warn!(
            "font family \"{}\" not registered; rendering placeholder boxes",
            payload.font_family
        );
    }
    let layout = layout_block(payload, font);

    let px_w = (layout.width * sx).ceil().max(1.0) as u32;
    let px_h = (layout.height * sy).ceil().max(1.0) as u32;
    let mut pixmap = Pixmap::new(px_w, px_h)?;

    let color = payload.fill;
    match font {
        Some(font) => draw_glyph_lines(&mut pixmap, payload, &layout, font, sx, sy),
        None => draw_placeholder_lines(&mut pixmap, payload, &layout, sx, sy),
    }

    if payload.underline {
        let thickness = (payload.font_size_px * 0.06 * sy).max(1.0);
        for (i, line) in layout.lines.iter().enumerate() {
            let x0 = align_offset(payload.align, layout.width, line.width) * sx;
            let y = ((i as f32 + 0.9) * layout.line_height) * sy;
            fill_rect_px(
                &mut pixmap,
                x0,
                y,
                line.width * sx,
                thickness,
                color.r,
                color.g,
                color.b,
                color.a,
            );
        }
    }

    Some((pixmap, layout.width, layout.height))
}

fn draw_glyph_lines(
    pixmap: &mut Pixmap,
    payload: &TextPayload,
    layout: &BlockLayout,
    font: &FontArc,
    sx: f32,
    sy: f32,
) {
    let scale = PxScale {
        x: payload.font_size_px * sx,
        y: payload.font_size_px * sy,
    };
    let scaled = font.as_scaled(scale);
    let ascent = scaled.ascent();
    let c = payload.fill;
    // Faux bold: a second pass offset by a fraction of the stem width.
    let passes: &[f32] = if payload.bold { &[0.0, 1.0] } else { &[0.0] };

    for (i, line) in layout.lines.iter().enumerate() {
        let mut pen_x = align_offset(payload.align, layout.width, line.width) * sx;
        let baseline = (i as f32 * layout.line_height) * sy + ascent;

        for ch in line.text.chars() {
            let glyph_id = font.glyph_id(ch);
            for pass in passes {
                let glyph = glyph_id.with_scale_and_position(
                    scale,
                    ab_glyph::point(pen_x + pass * sx * 0.7, baseline),
                );
                if let Some(outline) = font.outline_glyph(glyph) {
                    let bounds = outline.px_bounds();
                    outline.draw(|gx, gy, cov| {
                        let px = bounds.min.x + gx as f32;
                        let py = bounds.min.y + gy as f32;
                        blend_px(pixmap, px as i32, py as i32, c.r, c.g, c.b, c.a * cov);
                    });
                }
            }
            pen_x += scaled.h_advance(glyph_id) + payload.char_spacing * sx;
        }
    }
}

/// Per-char filled cells at the estimated advance — the no-font fallback.
fn draw_placeholder_lines(
    pixmap: &mut Pixmap,
    payload: &TextPayload,
    layout: &BlockLayout,
    sx: f32,
    sy: f32,
) {
    let size = payload.font_size_px;
    let cell = size * 0.6 + payload.char_spacing;
    let c = payload.fill;

    for (i, line) in layout.lines.iter().enumerate() {
        let mut x = align_offset(payload.align, layout.width, line.width) * sx;
        let top = (i as f32 * layout.line_height + size * 0.15) * sy;
        for ch in line.text.chars() {
            if !ch.is_whitespace() {
                fill_rect_px(
                    pixmap,
                    x,
                    top,
                    (cell - size * 0.1) * sx,
                    size * 0.7 * sy,
                    c.r,
                    c.g,
                    c.b,
                    c.a,
                );
            }
            x += cell * sx;
        }
    }
}

// ─── Pixel helpers ───────────────────────────────────────────────────────

fn blend_px(pixmap: &mut Pixmap, x: i32, y: i32, r: f32, g: f32, b: f32, a: f32) {
    if x < 0 || y < 0 || x >= pixmap.width() as i32 || y >= pixmap.height() as i32 {
        return;
    }
    let a = a.clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    let idx = y as usize * pixmap.width() as usize + x as usize;
    let dst = pixmap.pixels()[idx];

    // Source-over in premultiplied space.
    let inv = 1.0 - a;
    let out_r = r * a + dst.red() as f32 / 255.0 * inv;
    let out_g = g * a + dst.green() as f32 / 255.0 * inv;
    let out_b = b * a + dst.blue() as f32 / 255.0 * inv;
    let out_a = a + dst.alpha() as f32 / 255.0 * inv;

    // Premultiplied invariant: channels never exceed alpha (rounding guard).
    let a8 = (out_a * 255.0).round().min(255.0) as u8;
    let to_u8 = |v: f32| ((v * 255.0).round().min(255.0) as u8).min(a8);
    if let Some(px) =
        tiny_skia::PremultipliedColorU8::from_rgba(to_u8(out_r), to_u8(out_g), to_u8(out_b), a8)
    {
        pixmap.pixels_mut()[idx] = px;
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_rect_px(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, r: f32, g: f32, b: f32, a: f32) {
    let x0 = x.floor().max(0.0) as i32;
    let y0 = y.floor().max(0.0) as i32;
    let x1 = ((x + w).ceil() as i32).min(pixmap.width() as i32);
    let y1 = ((y + h).ceil() as i32).min(pixmap.height() as i32);
    for py in y0..y1 {
        for px in x0..x1 {
            blend_px(pixmap, px, py, r, g, b, a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_core::model::TextPayload;

    fn payload(content: &str) -> TextPayload {
        TextPayload::new(content, "Inter")
    }

    #[test]
    fn layout_without_font_matches_estimate() {
        let p = payload("HELLO");
        let l = layout_block(&p, None);
        assert_eq!(l.lines.len(), 1);
        assert!((l.width - 5.0 * p.font_size_px * 0.6).abs() < 1e-3);
        assert!((l.height - p.font_size_px * p.line_height).abs() < 1e-3);
    }

    #[test]
    fn layout_multiline() {
        let p = payload("AB\nC");
        let l = layout_block(&p, None);
        assert_eq!(l.lines.len(), 2);
        assert!(l.lines[0].width > l.lines[1].width);
    }

    #[test]
    fn placeholder_raster_is_non_empty() {
        let fonts = FontStore::new();
        let (pixmap, _, _) = rasterize_block(&payload("HELLO"), &fonts, 1.0, 1.0).unwrap();
        assert!(
            pixmap.pixels().iter().any(|p| p.alpha() > 0),
            "fallback must produce visible pixels"
        );
    }

    #[test]
    fn raster_scales_with_dpi() {
        let fonts = FontStore::new();
        let p = payload("HI");
        let (small, ..) = rasterize_block(&p, &fonts, 1.0, 1.0).unwrap();
        let (large, ..) = rasterize_block(&p, &fonts, 3.125, 3.125).unwrap();
        assert!(large.width() > small.width() * 3);
        assert!(large.height() > small.height() * 3);
    }
}
