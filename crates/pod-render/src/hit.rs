//! Hit testing: point → object lookup.
//!
//! Walks the side's list back-to-front (last painted = topmost) over the
//! geometry module's bounds. The mockup and boundary are not in the
//! document, so they can never be hit — only design objects are selectable.

use pod_core::{ObjectId, SideDocument, compute_bounds};

/// Find the topmost object at `(px, py)` surface position.
/// Returns `None` on empty surface (background / system objects).
pub fn topmost_at(doc: &SideDocument, px: f32, py: f32) -> Option<ObjectId> {
    doc.objects()
        .iter()
        .rev()
        .find(|obj| compute_bounds(obj).contains_point(px, py))
        .map(|obj| obj.id)
}
