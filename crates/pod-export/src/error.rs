use pod_core::Side;
use pod_render::RenderError;
use thiserror::Error;

/// An image or mockup asset could not be loaded. Non-fatal for rendering:
/// captures proceed best-effort without the asset, and the condition is
/// surfaced as a warning rather than a hard failure.
///
/// Note there is deliberately no timeout variant — exceeding the asset wait
/// is a logged condition, not an error (capture proceeds anyway).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetLoadError {
    #[error("asset \"{0}\" not found")]
    NotFound(String),
    #[error("asset \"{source}\" could not be decoded: {reason}")]
    Decode { source: String, reason: String },
    #[error("transport failure for \"{source}\": {reason}")]
    Transport { source: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("upload of \"{filename}\" failed: {reason}")]
pub struct UploadError {
    pub filename: String,
    pub reason: String,
}

/// Raster capture for one side failed. Fatal for that side's export; the
/// caller learns which side so the flow can name it to the user while
/// preserving the entered design.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("export of the {side} side failed: {reason}")]
pub struct ExportFailedError {
    pub side: Side,
    pub reason: ExportFailureReason,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportFailureReason {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("the working surface is busy with another switch or export")]
    Busy,
}
