//! Demo: compose a two-sided design in memory and export both sides.
//!
//! Run with `RUST_LOG=debug cargo run -p pod-export --example export_demo`.
//! Writes the four artifacts (preview/print per side) into a temp directory.

use pod_core::model::{Color, ShapeGeometry, ShapePayload, TextPayload};
use pod_core::{Side, SourceRef, StudioConfig};
use pod_editor::{Editor, SideAssets};
use pod_export::{AssetLoadError, AssetResolver, ImageHandle, export_sides, switch_side};
use pod_render::{FontStore, RasterStore};
use std::fs;

/// Generates flat-color garment mockups instead of fetching them.
struct GeneratedMockups;

impl AssetResolver for GeneratedMockups {
    async fn load_image(&self, source: &SourceRef) -> Result<ImageHandle, AssetLoadError> {
        let shade = if source.as_str().contains("front") {
            [235u8, 235, 240, 255]
        } else {
            [60, 60, 70, 255]
        };
        Ok(ImageHandle::from_rgba(50, 62, shade.repeat(50 * 62)))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let mut editor = Editor::new(
        StudioConfig::default(),
        SideAssets {
            front: Some(SourceRef::new("mockups/front")),
            back: Some(SourceRef::new("mockups/back")),
        },
    );
    let mut store = RasterStore::new();
    let fonts = FontStore::new();
    let resolver = GeneratedMockups;

    // Front: a badge with a label.
    editor
        .add_shape(
            ShapePayload {
                geometry: ShapeGeometry::Ellipse { rx: 80.0, ry: 80.0 },
                fill: Color::from_hex("#FDCB6E").unwrap(),
                stroke: Color::from_hex("#2D3436").unwrap(),
                stroke_width_px: 3.0,
            },
            250.0,
            280.0,
        )
        .expect("valid shape");
    editor
        .add_text(TextPayload::new("PODSTUDIO", "Inter"), 250.0, 280.0)
        .expect("valid text");

    // Back: a single line near the top of the print area.
    switch_side(&mut editor, &resolver, &mut store, Side::Back)
        .await
        .expect("switch to back");
    editor
        .add_text(TextPayload::new("EST. 2026", "Inter"), 250.0, 180.0)
        .expect("valid text");

    let results = export_sides(
        &mut editor,
        &mut store,
        &fonts,
        &resolver,
        &[Side::Front, Side::Back],
    )
    .await;

    let out_dir = std::env::temp_dir().join("podstudio-demo");
    fs::create_dir_all(&out_dir).expect("create output dir");

    for (side, result) in results {
        match result {
            Ok(export) => {
                let preview = out_dir.join(format!("{side}-preview.png"));
                let print = out_dir.join(format!("{side}-print.png"));
                fs::write(&preview, &export.preview_png).expect("write preview");
                fs::write(&print, &export.print_png).expect("write print");
                println!(
                    "{side}: preview {}x{} -> {}, print {}x{} -> {}",
                    export.preview_size.0,
                    export.preview_size.1,
                    preview.display(),
                    export.print_size.0,
                    export.print_size.1,
                    print.display(),
                );
            }
            Err(err) => eprintln!("{err}"),
        }
    }
}
