//! The deterministic two-capture export pipeline.
//!
//! For a requested side: take the surface exclusively, switch to the side if
//! needed (awaiting its mockup, bounded), capture the preview (full scene,
//! opaque background, boundary hidden) and the print raster (design only,
//! transparent, cropped to the print area, upscaled to production DPI),
//! encode both as PNG, then restore the originally-active side. Restoration
//! runs on the error path too — an export can never leave the editor on the
//! wrong side or the surface marked busy.
//!
//! Capture-time visibility (boundary/mockup/background) only ever exists in
//! the derived `SurfaceSpec` values, so there is no cosmetic state to
//! restore or accidentally persist.

use crate::assets::{AssetResolver, ensure_asset};
use crate::error::{ExportFailedError, ExportFailureReason};
use pod_core::{Side, Snapshot};
use pod_editor::Editor;
use pod_render::{FontStore, RasterStore, render_region, render_surface};
use std::time::Duration;

/// Everything the caller needs from one side's export.
#[derive(Debug, Clone)]
pub struct SideExport {
    pub side: Side,
    /// Design objects only — boundary and mockup are unrepresentable here.
    pub snapshot: Snapshot,
    pub preview_png: Vec<u8>,
    pub print_png: Vec<u8>,
    pub preview_size: (u32, u32),
    pub print_size: (u32, u32),
}

/// Export one side. The editor's active side and live objects are exactly
/// as before the call when it returns, success or failure.
pub async fn export_side<R: AssetResolver>(
    editor: &mut Editor,
    store: &mut RasterStore,
    fonts: &FontStore,
    resolver: &R,
    side: Side,
) -> Result<SideExport, ExportFailedError> {
    let original = editor.controller().active();
    editor
        .controller_mut()
        .begin_exclusive()
        .map_err(|_| ExportFailedError {
            side,
            reason: ExportFailureReason::Busy,
        })?;

    let result = capture_side(editor, store, fonts, resolver, side).await;

    // Steps 5–6: restore the original active side and release the surface,
    // on success and failure alike.
    editor.controller_mut().switch_unguarded(original);
    editor.controller_mut().end_exclusive();
    result
}

/// Export several sides with independent per-side results: one side's
/// failure never blocks the others.
pub async fn export_sides<R: AssetResolver>(
    editor: &mut Editor,
    store: &mut RasterStore,
    fonts: &FontStore,
    resolver: &R,
    sides: &[Side],
) -> Vec<(Side, Result<SideExport, ExportFailedError>)> {
    let mut results = Vec::with_capacity(sides.len());
    for &side in sides {
        results.push((side, export_side(editor, store, fonts, resolver, side).await));
    }
    results
}

async fn capture_side<R: AssetResolver>(
    editor: &mut Editor,
    store: &mut RasterStore,
    fonts: &FontStore,
    resolver: &R,
    side: Side,
) -> Result<SideExport, ExportFailedError> {
    let wait = Duration::from_millis(editor.config().asset_wait_ms);
    let print_area = editor.config().print_area;
    let dpi_scale = editor.config().dpi_scale();
    let fail = |reason: ExportFailureReason| ExportFailedError { side, reason };

    // Step 1: make the requested side live (no-op when already active).
    editor.controller_mut().switch_unguarded(side);

    // Step 2: wait for the mockup, bounded; on timeout capture proceeds.
    if let Some(mockup) = editor.controller().mockup_for(side).cloned() {
        if !ensure_asset(resolver, store, &mockup, wait).await {
            log::warn!("exporting {side} side without its mockup");
        }
    }

    let controller = editor.controller();
    let doc = controller.live();
    let surface = controller.surface();

    // Step 3: preview capture — full scene, opaque, boundary hidden.
    let preview = render_surface(doc, &surface.for_preview(), store, fonts)
        .map_err(|e| fail(ExportFailureReason::Render(e)))?;

    // Step 4: print capture — design only, transparent, cropped + upscaled.
    let print = render_region(doc, &surface.for_print(), store, fonts, print_area, dpi_scale)
        .map_err(|e| fail(ExportFailureReason::Render(e)))?;

    let preview_size = (preview.width(), preview.height());
    let print_size = (print.width(), print.height());
    let preview_png = preview
        .encode_png()
        .map_err(|e| fail(ExportFailureReason::Encode(e.to_string())))?;
    let print_png = print
        .encode_png()
        .map_err(|e| fail(ExportFailureReason::Encode(e.to_string())))?;

    // Step 7: artifacts plus the design-only snapshot.
    Ok(SideExport {
        side,
        snapshot: doc.serialize(),
        preview_png,
        print_png,
        preview_size,
        print_size,
    })
}
