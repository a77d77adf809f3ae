//! Geometry and constraint enforcement.
//!
//! Pure functions over `PlaceableObject` transforms: axis-aligned bounds
//! (scale + rotation aware), translate-only clamping into the print area,
//! and center snapping with a tolerance. The interaction layer calls
//! `clamp_into_rect` + `snap_to_center` on every pointer move of a drag and
//! `clamp_into_rect` alone during a resize.

use crate::model::PlaceableObject;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in working-surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Whole-rect containment, with a small epsilon for float drift.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }

    /// Scale position and size uniformly (print-DPI upscaling).
    pub fn scaled(&self, s: f32) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
            width: self.width * s,
            height: self.height * s,
        }
    }
}

/// Axis-aligned bounding box of the object after scale and rotation,
/// centered on the transform's `(x, y)`.
pub fn compute_bounds(obj: &PlaceableObject) -> Rect {
    let (bw, bh) = obj.base_size();
    let w = bw * obj.transform.scale_x;
    let h = bh * obj.transform.scale_y;

    let theta = obj.transform.rotation_degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let half_w = (w * cos + h * sin) / 2.0;
    let half_h = (w * sin + h * cos) / 2.0;

    Rect {
        x: obj.transform.x - half_w,
        y: obj.transform.y - half_h,
        width: half_w * 2.0,
        height: half_h * 2.0,
    }
}

/// Translate the object the minimum distance needed so its bounds sit inside
/// `rect`. Never scales. Idempotent: a contained object is left untouched.
///
/// If the object is larger than `rect` on an axis there is no translation
/// that contains it; we center it on that axis instead, which keeps the
/// operation idempotent and the overflow symmetric.
pub fn clamp_into_rect(obj: &mut PlaceableObject, rect: Rect) {
    // Sub-epsilon overhangs count as contained, so a corrected object is a
    // fixed point of this function despite float rounding.
    const EPS: f32 = 1e-3;
    let bounds = compute_bounds(obj);
    let (rcx, rcy) = rect.center();

    if bounds.width > rect.width + EPS {
        obj.transform.x = rcx;
    } else if bounds.x < rect.x - EPS {
        obj.transform.x += rect.x - bounds.x;
    } else if bounds.right() > rect.right() + EPS {
        obj.transform.x -= bounds.right() - rect.right();
    }

    if bounds.height > rect.height + EPS {
        obj.transform.y = rcy;
    } else if bounds.y < rect.y - EPS {
        obj.transform.y += rect.y - bounds.y;
    } else if bounds.bottom() > rect.bottom() + EPS {
        obj.transform.y -= bounds.bottom() - rect.bottom();
    }
}

/// Snap the object's center to the surface center line when it is within
/// `tolerance_px`, independently per axis. Outside the tolerance the
/// transform is untouched.
pub fn snap_to_center(obj: &mut PlaceableObject, surface_center: (f32, f32), tolerance_px: f32) {
    let (cx, cy) = surface_center;
    if (obj.transform.x - cx).abs() <= tolerance_px {
        obj.transform.x = cx;
    }
    if (obj.transform.y - cy).abs() <= tolerance_px {
        obj.transform.y = cy;
    }
}
