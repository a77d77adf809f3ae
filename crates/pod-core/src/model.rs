//! Core data model for one personalization document.
//!
//! A side's document is an ordered list of `PlaceableObject` values — a
//! closed, tagged union over text, image, and shape payloads. The transform
//! origin is always the object's center so constraint math (clamping,
//! snapping) works the same for every kind. The print-area boundary and the
//! garment mockup are *not* objects: they belong to the render surface spec
//! and can therefore never leak into a snapshot or an export payload.

use crate::error::InvalidObjectError;
use crate::id::ObjectId;
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let nibble = |i: usize| hex_val(bytes[i]).map(|v| (v * 17) as f32 / 255.0);
        let byte = |i: usize| {
            let hi = hex_val(bytes[i])?;
            let lo = hex_val(bytes[i + 1])?;
            Some((hi << 4 | lo) as f32 / 255.0)
        };

        match bytes.len() {
            3 => Some(Self::rgba(nibble(0)?, nibble(1)?, nibble(2)?, 1.0)),
            4 => Some(Self::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, 1.0)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        let a = (self.a * 255.0).round() as u8;
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

// ─── Transform ───────────────────────────────────────────────────────────

/// Placement of an object on the working surface. `(x, y)` is the object's
/// *center* in surface pixel coordinates — every kind shares this origin so
/// the geometry module can treat them uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation_degrees: f32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation_degrees: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.scale_x.is_finite()
            && self.scale_y.is_finite()
            && self.rotation_degrees.is_finite()
    }
}

// ─── Asset references ────────────────────────────────────────────────────

/// Opaque reference to an image asset (URL or upload handle). The core never
/// interprets the contents; resolvers and raster caches key on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(pub String);

impl SourceRef {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ─── Kind payloads ───────────────────────────────────────────────────────

/// Horizontal text alignment within the text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    pub content: String,
    pub font_family: String,
    pub font_size_px: f32,
    pub fill: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: TextAlign,
    /// Extra spacing between characters, in px.
    pub char_spacing: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

impl TextPayload {
    pub fn new(content: impl Into<String>, font_family: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_family: font_family.into(),
            font_size_px: 32.0,
            fill: Color::BLACK,
            bold: false,
            italic: false,
            underline: false,
            align: TextAlign::Center,
            char_spacing: 0.0,
            line_height: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub source: SourceRef,
    pub natural_width: f32,
    pub natural_height: f32,
}

/// Parametric shape geometry, unscaled. The transform's scale applies on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ShapeGeometry {
    Rect {
        width: f32,
        height: f32,
        corner_radius: f32,
    },
    Ellipse {
        rx: f32,
        ry: f32,
    },
    Triangle {
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapePayload {
    pub geometry: ShapeGeometry,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width_px: f32,
}

// ─── Placeable objects ───────────────────────────────────────────────────

/// The closed set of object kinds a user can place on a side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectKind {
    Text(TextPayload),
    Image(ImagePayload),
    Shape(ShapePayload),
}

impl ObjectKind {
    /// Short name used for id prefixes and logging.
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Text(_) => "text",
            ObjectKind::Image(_) => "image",
            ObjectKind::Shape(_) => "shape",
        }
    }
}

/// One user-placed element of a side's design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceableObject {
    pub id: ObjectId,
    #[serde(flatten)]
    pub kind: ObjectKind,
    pub transform: Transform,
    pub opacity: f32,
    pub locked: bool,
}

impl PlaceableObject {
    pub fn new(kind: ObjectKind, transform: Transform) -> Self {
        Self {
            id: ObjectId::fresh(kind.name()),
            kind,
            transform,
            opacity: 1.0,
            locked: false,
        }
    }

    pub fn text(payload: TextPayload, transform: Transform) -> Self {
        Self::new(ObjectKind::Text(payload), transform)
    }

    pub fn image(payload: ImagePayload, transform: Transform) -> Self {
        Self::new(ObjectKind::Image(payload), transform)
    }

    pub fn shape(payload: ShapePayload, transform: Transform) -> Self {
        Self::new(ObjectKind::Shape(payload), transform)
    }

    /// Unscaled width × height of the object's content box.
    ///
    /// Text uses a per-char estimate (0.6 em advance plus char spacing); the
    /// renderer measures real glyph metrics when a font is registered, so
    /// constraint math is conservative rather than glyph-exact.
    pub fn base_size(&self) -> (f32, f32) {
        match &self.kind {
            ObjectKind::Text(t) => {
                let mut widest = 0usize;
                let mut lines = 0usize;
                for line in t.content.lines() {
                    widest = widest.max(line.chars().count());
                    lines += 1;
                }
                let lines = lines.max(1);
                let w = widest as f32 * (t.font_size_px * 0.6 + t.char_spacing);
                let h = lines as f32 * t.font_size_px * t.line_height;
                (w.max(1.0), h.max(1.0))
            }
            ObjectKind::Image(i) => (i.natural_width, i.natural_height),
            ObjectKind::Shape(s) => match s.geometry {
                ShapeGeometry::Rect { width, height, .. } => (width, height),
                ShapeGeometry::Ellipse { rx, ry } => (rx * 2.0, ry * 2.0),
                ShapeGeometry::Triangle { width, height } => (width, height),
            },
        }
    }

    /// Reject malformed objects before they reach a document.
    pub fn validate(&self) -> Result<(), InvalidObjectError> {
        if !self.transform.is_finite() {
            return Err(InvalidObjectError::NonFiniteTransform(self.id));
        }
        if self.transform.scale_x <= 0.0 || self.transform.scale_y <= 0.0 {
            return Err(InvalidObjectError::NonPositiveScale(self.id));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(InvalidObjectError::OpacityOutOfRange(self.opacity));
        }
        match &self.kind {
            ObjectKind::Text(t) => {
                if t.content.is_empty() {
                    return Err(InvalidObjectError::EmptyTextContent(self.id));
                }
                if t.font_family.is_empty() {
                    return Err(InvalidObjectError::MissingFontFamily(self.id));
                }
                if t.font_size_px <= 0.0 || !t.font_size_px.is_finite() {
                    return Err(InvalidObjectError::NonPositiveFontSize(t.font_size_px));
                }
            }
            ObjectKind::Image(i) => {
                if i.source.as_str().is_empty() {
                    return Err(InvalidObjectError::EmptyImageSource(self.id));
                }
                if i.natural_width <= 0.0 || i.natural_height <= 0.0 {
                    return Err(InvalidObjectError::NonPositiveImageSize(self.id));
                }
            }
            ObjectKind::Shape(s) => {
                let (w, h) = self.base_size();
                if w <= 0.0 || h <= 0.0 {
                    return Err(InvalidObjectError::NonPositiveShapeSize(self.id));
                }
                if s.stroke_width_px < 0.0 {
                    return Err(InvalidObjectError::NegativeStrokeWidth(s.stroke_width_px));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#6C5CE7").unwrap();
        assert_eq!(c.to_hex(), "#6C5CE7");

        let c2 = Color::from_hex("#FF000080").unwrap();
        assert!((c2.a - 128.0 / 255.0).abs() < 0.01);
        assert_eq!(c2.to_hex().len(), 9); // #RRGGBBAA
    }

    #[test]
    fn color_short_hex() {
        let c = Color::from_hex("FFF").unwrap();
        assert_eq!(c.to_hex(), "#FFFFFF");
    }

    #[test]
    fn text_base_size_scales_with_content() {
        let one = PlaceableObject::text(TextPayload::new("HI", "Inter"), Transform::default());
        let two = PlaceableObject::text(TextPayload::new("HELLO", "Inter"), Transform::default());
        assert!(two.base_size().0 > one.base_size().0);

        let multi =
            PlaceableObject::text(TextPayload::new("HI\nTHERE", "Inter"), Transform::default());
        assert!(multi.base_size().1 > one.base_size().1);
    }

    #[test]
    fn validate_rejects_non_finite_transform() {
        let mut obj = PlaceableObject::shape(
            ShapePayload {
                geometry: ShapeGeometry::Rect {
                    width: 10.0,
                    height: 10.0,
                    corner_radius: 0.0,
                },
                fill: Color::BLACK,
                stroke: Color::BLACK,
                stroke_width_px: 0.0,
            },
            Transform::default(),
        );
        obj.transform.x = f32::NAN;
        assert!(matches!(
            obj.validate(),
            Err(InvalidObjectError::NonFiniteTransform(_))
        ));
    }

    #[test]
    fn validate_rejects_incomplete_payloads() {
        let empty_text =
            PlaceableObject::text(TextPayload::new("", "Inter"), Transform::default());
        assert!(matches!(
            empty_text.validate(),
            Err(InvalidObjectError::EmptyTextContent(_))
        ));

        let bad_image = PlaceableObject::image(
            ImagePayload {
                source: SourceRef::new("album/cat.png"),
                natural_width: 0.0,
                natural_height: 40.0,
            },
            Transform::default(),
        );
        assert!(matches!(
            bad_image.validate(),
            Err(InvalidObjectError::NonPositiveImageSize(_))
        ));
    }

    #[test]
    fn tagged_kind_serializes_with_kind_field() {
        let obj = PlaceableObject::text(TextPayload::new("HELLO", "Inter"), Transform::at(5.0, 6.0));
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["content"], "HELLO");
    }
}
