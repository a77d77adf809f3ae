//! Asset resolution: the seam between the engine and asset transport.
//!
//! Template/album images, user uploads, and garment mockups all arrive
//! through an `AssetResolver`. Loads are awaited with a bounded timeout;
//! a load that fails or overruns is logged and rendering proceeds without
//! the asset — a missing background is a visual defect, not a fatal error.

use crate::error::AssetLoadError;
use pod_core::{Side, SourceRef};
use pod_editor::{Editor, EditorError};
use pod_render::RasterStore;
use std::time::Duration;

/// Decoded RGBA pixels for one loaded asset.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    pub width: u32,
    pub height: u32,
    /// Straight (non-premultiplied) RGBA8, row-major.
    pub rgba: Vec<u8>,
}

impl ImageHandle {
    /// Decode encoded bytes (PNG/JPEG) into RGBA pixels.
    pub fn decode(source: &SourceRef, bytes: &[u8]) -> Result<Self, AssetLoadError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| AssetLoadError::Decode {
            source: source.as_str().to_string(),
            reason: e.to_string(),
        })?;
        let rgba = decoded.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }

    /// Wrap raw RGBA pixels (already decoded by the host).
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }
}

/// Loads image assets by reference. Transport (HTTP, blob store, bundled
/// templates) lives entirely behind this trait.
#[allow(async_fn_in_trait)]
pub trait AssetResolver {
    async fn load_image(&self, source: &SourceRef) -> Result<ImageHandle, AssetLoadError>;
}

/// Make sure `source` is present in the raster store, waiting at most
/// `wait`. Returns whether the asset is available afterwards; failure and
/// timeout both degrade to a warning (best-effort policy).
pub async fn ensure_asset<R: AssetResolver>(
    resolver: &R,
    store: &mut RasterStore,
    source: &SourceRef,
    wait: Duration,
) -> bool {
    if store.contains(source) {
        return true;
    }
    match tokio::time::timeout(wait, resolver.load_image(source)).await {
        Ok(Ok(handle)) => store.insert_rgba(source.clone(), handle.width, handle.height, &handle.rgba),
        Ok(Err(err)) => {
            log::warn!("asset load failed, rendering without it: {err}");
            false
        }
        Err(_) => {
            log::warn!(
                "asset \"{}\" did not resolve within {:?}; proceeding best-effort",
                source.as_str(),
                wait
            );
            false
        }
    }
}

/// Side switch with the asset-ready wait: resolve the target side's mockup
/// (bounded) before the controller flips the surface.
pub async fn switch_side<R: AssetResolver>(
    editor: &mut Editor,
    resolver: &R,
    store: &mut RasterStore,
    target: Side,
) -> Result<(), EditorError> {
    if let Some(mockup) = editor.controller().mockup_for(target).cloned() {
        let wait = Duration::from_millis(editor.config().asset_wait_ms);
        ensure_asset(resolver, store, &mockup, wait).await;
    }
    editor.switch_side(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapResolver(HashMap<SourceRef, ImageHandle>);

    impl AssetResolver for MapResolver {
        async fn load_image(&self, source: &SourceRef) -> Result<ImageHandle, AssetLoadError> {
            self.0
                .get(source)
                .cloned()
                .ok_or_else(|| AssetLoadError::NotFound(source.as_str().to_string()))
        }
    }

    #[tokio::test]
    async fn ensure_asset_populates_store() {
        let src = SourceRef::new("album/dot.png");
        let mut map = HashMap::new();
        map.insert(src.clone(), ImageHandle::from_rgba(2, 2, vec![255u8; 16]));
        let resolver = MapResolver(map);

        let mut store = RasterStore::new();
        assert!(ensure_asset(&resolver, &mut store, &src, Duration::from_secs(1)).await);
        assert!(store.contains(&src));
        // Second call is a cache hit
        assert!(ensure_asset(&resolver, &mut store, &src, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn missing_asset_degrades_to_false() {
        let resolver = MapResolver(HashMap::new());
        let mut store = RasterStore::new();
        let src = SourceRef::new("nope.png");
        assert!(!ensure_asset(&resolver, &mut store, &src, Duration::from_secs(1)).await);
        assert!(!store.contains(&src));
    }
}
