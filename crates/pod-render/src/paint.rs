//! Rasterization of a side's document onto a pixmap.
//!
//! Paint order: background → mockup → design objects in z-order → boundary.
//! `render_region` is the same walk restricted to a crop rectangle with a
//! uniform upscale; the print capture uses it with the print area and the
//! DPI factor so the design lands pixel-exact in production resolution.

use crate::scene::{RasterStore, SurfaceSpec};
use crate::text::{FontStore, rasterize_block};
use pod_core::model::{Color, ObjectKind, PlaceableObject, ShapeGeometry};
use pod_core::{Rect, SideDocument};
use thiserror::Error;
use tiny_skia::{
    FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, StrokeDash, Transform,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("capture region is zero-sized ({width} x {height})")]
    ZeroSizedRegion { width: f32, height: f32 },
    #[error("pixmap allocation failed ({width} x {height})")]
    PixmapAlloc { width: u32, height: u32 },
}

/// Render the full working surface at display resolution.
pub fn render_surface(
    doc: &SideDocument,
    spec: &SurfaceSpec,
    store: &RasterStore,
    fonts: &FontStore,
) -> Result<Pixmap, RenderError> {
    render_region(doc, spec, store, fonts, spec.full_rect(), 1.0)
}

/// Render only `crop`, upscaled by `scale`.
pub fn render_region(
    doc: &SideDocument,
    spec: &SurfaceSpec,
    store: &RasterStore,
    fonts: &FontStore,
    crop: Rect,
    scale: f32,
) -> Result<Pixmap, RenderError> {
    let px_w = (crop.width * scale).round();
    let px_h = (crop.height * scale).round();
    if px_w < 1.0 || px_h < 1.0 || !px_w.is_finite() || !px_h.is_finite() {
        return Err(RenderError::ZeroSizedRegion {
            width: crop.width,
            height: crop.height,
        });
    }
    let (px_w, px_h) = (px_w as u32, px_h as u32);
    let mut pixmap = Pixmap::new(px_w, px_h).ok_or(RenderError::PixmapAlloc {
        width: px_w,
        height: px_h,
    })?;

    // Surface coords → capture pixels.
    let base = Transform::from_translate(-crop.x, -crop.y).post_scale(scale, scale);

    if let Some(bg) = spec.background {
        pixmap.fill(to_sk_color(bg));
    }

    if spec.mockup_visible
        && let Some(source) = &spec.mockup
    {
        match store.get(source) {
            Some(mock) => {
                let t = Transform::from_scale(
                    spec.width as f32 / mock.width() as f32,
                    spec.height as f32 / mock.height() as f32,
                )
                .post_concat(base);
                pixmap.draw_pixmap(0, 0, mock.as_ref(), &bilinear(1.0), t, None);
            }
            None => log::warn!("mockup {:?} not loaded; rendering without it", source.as_str()),
        }
    }

    for obj in doc.objects() {
        paint_object(&mut pixmap, obj, store, fonts, crop, scale);
    }

    if spec.boundary_visible {
        paint_boundary(&mut pixmap, spec, base);
    }

    Ok(pixmap)
}

// ─── Object painters ─────────────────────────────────────────────────────

fn paint_object(
    pixmap: &mut Pixmap,
    obj: &PlaceableObject,
    store: &RasterStore,
    fonts: &FontStore,
    crop: Rect,
    scale: f32,
) {
    let t = &obj.transform;
    let (fx, fy) = (
        if t.flip_x { -1.0 } else { 1.0 },
        if t.flip_y { -1.0 } else { 1.0 },
    );
    // Object center in capture pixels.
    let (cx, cy) = ((t.x - crop.x) * scale, (t.y - crop.y) * scale);
    let rotate = Transform::from_rotate(t.rotation_degrees);

    match &obj.kind {
        ObjectKind::Shape(shape) => {
            let Some(path) = shape_path(&shape.geometry) else {
                return;
            };
            let affine = Transform::from_scale(t.scale_x * fx * scale, t.scale_y * fy * scale)
                .post_concat(rotate)
                .post_translate(cx, cy);

            let mut paint = Paint::default();
            paint.anti_alias = true;
            if shape.fill.a > 0.0 {
                paint.set_color(to_sk_color(shape.fill.with_alpha(shape.fill.a * obj.opacity)));
                pixmap.fill_path(&path, &paint, FillRule::Winding, affine, None);
            }
            if shape.stroke_width_px > 0.0 && shape.stroke.a > 0.0 {
                paint.set_color(to_sk_color(
                    shape.stroke.with_alpha(shape.stroke.a * obj.opacity),
                ));
                let stroke = Stroke {
                    width: shape.stroke_width_px,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, affine, None);
            }
        }

        ObjectKind::Image(img) => {
            let Some(source_px) = store.get(&img.source) else {
                log::warn!("image {:?} not loaded; skipping", img.source.as_str());
                return;
            };
            // Stored pixels → natural size → object scale → capture scale.
            let sx = img.natural_width / source_px.width() as f32 * t.scale_x * scale;
            let sy = img.natural_height / source_px.height() as f32 * t.scale_y * scale;
            let affine = Transform::from_translate(
                -(source_px.width() as f32) / 2.0,
                -(source_px.height() as f32) / 2.0,
            )
            .post_scale(sx * fx, sy * fy)
            .post_concat(rotate)
            .post_translate(cx, cy);
            pixmap.draw_pixmap(0, 0, source_px.as_ref(), &bilinear(obj.opacity), affine, None);
        }

        ObjectKind::Text(text) => {
            // Scale is baked into the glyph raster so edges stay crisp.
            let (esx, esy) = (t.scale_x * scale, t.scale_y * scale);
            let Some((block, _, _)) = rasterize_block(text, fonts, esx, esy) else {
                return;
            };
            let mut affine = Transform::from_translate(
                -(block.width() as f32) / 2.0,
                -(block.height() as f32) / 2.0,
            )
            .post_scale(fx, fy);
            if text.italic {
                // Shear ≈ 14° to the right.
                affine = affine.post_concat(Transform::from_row(1.0, 0.0, -0.25, 1.0, 0.0, 0.0));
            }
            let affine = affine.post_concat(rotate).post_translate(cx, cy);
            pixmap.draw_pixmap(0, 0, block.as_ref(), &bilinear(obj.opacity), affine, None);
        }
    }
}

fn paint_boundary(pixmap: &mut Pixmap, spec: &SurfaceSpec, base: Transform) {
    let pa = spec.print_area;
    let Some(rect) = tiny_skia::Rect::from_xywh(pa.x, pa.y, pa.width, pa.height) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.set_color(to_sk_color(spec.boundary_color));
    let stroke = Stroke {
        width: 1.5,
        dash: StrokeDash::new(vec![6.0, 4.0], 0.0),
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, base, None);
}

/// Local-space outline of a shape, centered on the origin.
fn shape_path(geometry: &ShapeGeometry) -> Option<tiny_skia::Path> {
    match *geometry {
        ShapeGeometry::Rect {
            width,
            height,
            corner_radius,
        } => {
            let (hw, hh) = (width / 2.0, height / 2.0);
            let r = corner_radius.clamp(0.0, hw.min(hh));
            if r <= 0.0 {
                return Some(PathBuilder::from_rect(tiny_skia::Rect::from_xywh(
                    -hw, -hh, width, height,
                )?));
            }
            let mut pb = PathBuilder::new();
            pb.move_to(-hw + r, -hh);
            pb.line_to(hw - r, -hh);
            pb.quad_to(hw, -hh, hw, -hh + r);
            pb.line_to(hw, hh - r);
            pb.quad_to(hw, hh, hw - r, hh);
            pb.line_to(-hw + r, hh);
            pb.quad_to(-hw, hh, -hw, hh - r);
            pb.line_to(-hw, -hh + r);
            pb.quad_to(-hw, -hh, -hw + r, -hh);
            pb.close();
            pb.finish()
        }
        ShapeGeometry::Ellipse { rx, ry } => {
            // Four cubic arcs with the circle approximation constant.
            const K: f32 = 0.552_284_75;
            let (kx, ky) = (rx * K, ry * K);
            let mut pb = PathBuilder::new();
            pb.move_to(0.0, -ry);
            pb.cubic_to(kx, -ry, rx, -ky, rx, 0.0);
            pb.cubic_to(rx, ky, kx, ry, 0.0, ry);
            pb.cubic_to(-kx, ry, -rx, ky, -rx, 0.0);
            pb.cubic_to(-rx, -ky, -kx, -ry, 0.0, -ry);
            pb.close();
            pb.finish()
        }
        ShapeGeometry::Triangle { width, height } => {
            let (hw, hh) = (width / 2.0, height / 2.0);
            let mut pb = PathBuilder::new();
            pb.move_to(-hw, hh);
            pb.line_to(hw, hh);
            pb.line_to(0.0, -hh);
            pb.close();
            pb.finish()
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn to_sk_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        c.r.clamp(0.0, 1.0),
        c.g.clamp(0.0, 1.0),
        c.b.clamp(0.0, 1.0),
        c.a.clamp(0.0, 1.0),
    )
    .unwrap_or(tiny_skia::Color::BLACK)
}

fn bilinear(opacity: f32) -> PixmapPaint {
    PixmapPaint {
        opacity,
        quality: tiny_skia::FilterQuality::Bilinear,
        ..PixmapPaint::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_core::model::{ShapePayload, Transform as ObjTransform};
    use pod_core::{Side, StudioConfig};

    fn shape_at(x: f32, y: f32, w: f32, h: f32, color: &str) -> PlaceableObject {
        PlaceableObject::shape(
            ShapePayload {
                geometry: ShapeGeometry::Rect {
                    width: w,
                    height: h,
                    corner_radius: 0.0,
                },
                fill: Color::from_hex(color).unwrap(),
                stroke: Color::BLACK,
                stroke_width_px: 0.0,
            },
            ObjTransform::at(x, y),
        )
    }

    fn setup() -> (SideDocument, SurfaceSpec, RasterStore, FontStore) {
        let cfg = StudioConfig::default();
        (
            SideDocument::new(Side::Front, cfg.duplicate_offset_px),
            SurfaceSpec::from_config(&cfg),
            RasterStore::new(),
            FontStore::new(),
        )
    }

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> tiny_skia::PremultipliedColorU8 {
        pixmap.pixels()[(y * pixmap.width() + x) as usize]
    }

    #[test]
    fn shape_lands_at_its_center() {
        let (mut doc, spec, store, fonts) = setup();
        doc.add_object(shape_at(250.0, 310.0, 40.0, 40.0, "#FF0000"))
            .unwrap();

        let out = render_surface(&doc, &spec, &store, &fonts).unwrap();
        let center = pixel(&out, 250, 310);
        assert!(center.red() > 200, "expected red fill at the object center");
        let corner = pixel(&out, 5, 5);
        assert!(corner.red() > 200 && corner.blue() > 200, "white background");
    }

    #[test]
    fn print_spec_renders_transparent_background() {
        let (doc, spec, store, fonts) = setup();
        let out = render_surface(&doc, &spec.for_print(), &store, &fonts).unwrap();
        assert!(
            out.pixels().iter().all(|p| p.alpha() == 0),
            "empty design over transparent background must have no pixels"
        );
    }

    #[test]
    fn region_capture_matches_cropped_surface() {
        let (mut doc, spec, store, fonts) = setup();
        doc.add_object(shape_at(250.0, 310.0, 60.0, 30.0, "#3366FF"))
            .unwrap();
        let print_spec = spec.for_print();

        let full = render_surface(&doc, &print_spec, &store, &fonts).unwrap();
        let crop = render_region(&doc, &print_spec, &store, &fonts, spec.print_area, 1.0).unwrap();

        let (ox, oy) = (spec.print_area.x as u32, spec.print_area.y as u32);
        for y in 0..crop.height() {
            for x in 0..crop.width() {
                assert_eq!(
                    pixel(&crop, x, y),
                    pixel(&full, x + ox, y + oy),
                    "crop pixel ({x},{y}) differs from full surface"
                );
            }
        }
    }

    #[test]
    fn region_upscale_dimensions() {
        let (doc, spec, store, fonts) = setup();
        let out = render_region(
            &doc,
            &spec.for_print(),
            &store,
            &fonts,
            spec.print_area,
            3.125,
        )
        .unwrap();
        assert_eq!(out.width(), 750);
        assert_eq!(out.height(), 1000);
    }

    #[test]
    fn zero_sized_region_is_an_error() {
        let (doc, spec, store, fonts) = setup();
        let err = render_region(
            &doc,
            &spec,
            &store,
            &fonts,
            Rect::new(0.0, 0.0, 0.0, 100.0),
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::ZeroSizedRegion { .. }));
    }

    #[test]
    fn boundary_hidden_in_preview_spec() {
        let (doc, spec, store, fonts) = setup();
        let with = render_surface(&doc, &spec, &store, &fonts).unwrap();
        let without = render_surface(&doc, &spec.for_preview(), &store, &fonts).unwrap();
        // The dashed boundary is the only difference between the two specs
        // here, so the captures must differ — and only the first may contain
        // non-white pixels.
        assert!(with.data() != without.data(), "boundary must be visible while editing");
        assert!(
            without
                .pixels()
                .iter()
                .all(|p| p.red() == 255 && p.green() == 255 && p.blue() == 255),
            "preview of an empty design must be pure background"
        );
    }

    #[test]
    fn opacity_fades_fill() {
        let (mut doc, spec, store, fonts) = setup();
        let id = doc
            .add_object(shape_at(250.0, 310.0, 40.0, 40.0, "#000000"))
            .unwrap();
        doc.set_opacity(id, 0.25).unwrap();
        let out = render_surface(&doc, &spec.for_print(), &store, &fonts).unwrap();
        let p = pixel(&out, 250, 310);
        assert!(p.alpha() > 40 && p.alpha() < 90, "alpha was {}", p.alpha());
    }

    #[test]
    fn missing_image_is_skipped_not_fatal() {
        let (mut doc, spec, store, fonts) = setup();
        doc.add_object(PlaceableObject::image(
            pod_core::model::ImagePayload {
                source: pod_core::SourceRef::new("missing.png"),
                natural_width: 50.0,
                natural_height: 50.0,
            },
            ObjTransform::at(250.0, 310.0),
        ))
        .unwrap();
        assert!(render_surface(&doc, &spec, &store, &fonts).is_ok());
    }
}
