use crate::id::ObjectId;
use thiserror::Error;

/// A malformed object was handed to the document. The offending operation
/// is aborted and the document left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidObjectError {
    #[error("object {0} has a non-finite transform")]
    NonFiniteTransform(ObjectId),
    #[error("object {0} has a non-positive scale")]
    NonPositiveScale(ObjectId),
    #[error("opacity {0} is outside [0, 1]")]
    OpacityOutOfRange(f32),
    #[error("text object {0} has empty content")]
    EmptyTextContent(ObjectId),
    #[error("text object {0} has no font family")]
    MissingFontFamily(ObjectId),
    #[error("font size {0} must be positive")]
    NonPositiveFontSize(f32),
    #[error("image object {0} has an empty source reference")]
    EmptyImageSource(ObjectId),
    #[error("image object {0} has non-positive natural dimensions")]
    NonPositiveImageSize(ObjectId),
    #[error("shape object {0} has non-positive dimensions")]
    NonPositiveShapeSize(ObjectId),
    #[error("stroke width {0} must not be negative")]
    NegativeStrokeWidth(f32),
}

/// Errors surfaced by document-level operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    InvalidObject(#[from] InvalidObjectError),
    #[error("object {0} is locked")]
    ObjectLocked(ObjectId),
    #[error("snapshot (de)serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}
