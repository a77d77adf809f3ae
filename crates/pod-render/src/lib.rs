pub mod hit;
pub mod paint;
pub mod scene;
pub mod text;

pub use hit::topmost_at;
pub use paint::{RenderError, render_region, render_surface};
pub use scene::{RasterStore, SurfaceSpec};
pub use text::{FontError, FontStore};

// Re-export tiny-skia so downstream crates don't need a direct dependency
// for pixmap handling.
pub use tiny_skia;
