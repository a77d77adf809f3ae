pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;

pub use config::StudioConfig;
pub use document::{Reorder, Side, SideDocument, Snapshot};
pub use error::{DocumentError, InvalidObjectError};
pub use geometry::{Rect, clamp_into_rect, compute_bounds, snap_to_center};
pub use id::ObjectId;
pub use model::*;
