pub mod assets;
pub mod error;
pub mod pipeline;
pub mod upload;

pub use assets::{AssetResolver, ImageHandle, ensure_asset, switch_side};
pub use error::{AssetLoadError, ExportFailedError, ExportFailureReason, UploadError};
pub use pipeline::{SideExport, export_side, export_sides};
pub use upload::{SideUploads, UploadSink, UploadedAsset, upload_export};
