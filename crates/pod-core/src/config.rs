//! Session configuration for the working surface and export pipeline.

use crate::geometry::Rect;
use serde::Deserialize;

/// Tunables for one editing session. Hosts usually deserialize this from
/// product configuration; `Default` matches the stock garment template.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Working surface size, in display pixels.
    pub surface_width: u32,
    pub surface_height: u32,
    /// The print area rectangle, identical for both sides of one session.
    pub print_area: Rect,
    /// Center-snap radius during drags.
    pub snap_tolerance_px: f32,
    /// Visual delta applied to duplicates and pastes.
    pub duplicate_offset_px: f32,
    /// Undo history depth. Bounds memory; 50 checkpoints is plenty for an
    /// editing session.
    pub history_limit: usize,
    /// How long side switches and exports wait for an asset before
    /// proceeding best-effort.
    pub asset_wait_ms: u64,
    /// Screen DPI the surface coordinates are authored at.
    pub baseline_dpi: f32,
    /// Production DPI for the print raster.
    pub target_dpi: f32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            surface_width: 500,
            surface_height: 620,
            print_area: Rect::new(130.0, 150.0, 240.0, 320.0),
            snap_tolerance_px: 10.0,
            duplicate_offset_px: 20.0,
            history_limit: 50,
            asset_wait_ms: 1500,
            baseline_dpi: 96.0,
            target_dpi: 300.0,
        }
    }
}

impl StudioConfig {
    /// Upscale factor from surface pixels to print pixels (300/96 ≈ 3.125).
    pub fn dpi_scale(&self) -> f32 {
        self.target_dpi / self.baseline_dpi
    }

    /// Surface center, the snap target for drags.
    pub fn surface_center(&self) -> (f32, f32) {
        (
            self.surface_width as f32 / 2.0,
            self.surface_height as f32 / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dpi_scale() {
        let cfg = StudioConfig::default();
        assert!((cfg.dpi_scale() - 3.125).abs() < 1e-6);
    }

    #[test]
    fn deserializes_partial_config() {
        let cfg: StudioConfig =
            serde_json::from_str(r#"{ "snap_tolerance_px": 6.0 }"#).unwrap();
        assert_eq!(cfg.snap_tolerance_px, 6.0);
        assert_eq!(cfg.history_limit, 50);
    }
}
