//! Interaction layer: pointer/keyboard input → document mutations.
//!
//! The `Editor` owns the selection, the single-slot clipboard, the gesture
//! state, and the undo history — explicit fields, not ambient globals. Drags
//! run clamp + snap on every move; resizes run clamp only. A gesture becomes
//! one history checkpoint on release.

use crate::controller::{ControllerError, SideAssets, SideController};
use crate::history::History;
use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use pod_core::error::{DocumentError, InvalidObjectError};
use pod_core::model::{ImagePayload, PlaceableObject, ShapePayload, TextPayload, Transform};
use pod_core::{
    ObjectId, Reorder, Side, SideDocument, StudioConfig, clamp_into_rect, compute_bounds,
    snap_to_center,
};
use pod_render::topmost_at;
use thiserror::Error;

/// Pointer distance within which a selection corner acts as a resize handle.
const HANDLE_RADIUS: f32 = 10.0;
/// Scale floor so a resize can never collapse an object.
const MIN_SCALE: f32 = 0.05;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("the working surface is busy with a side switch or export")]
    SurfaceBusy,
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    InvalidObject(#[from] InvalidObjectError),
}

impl From<ControllerError> for EditorError {
    fn from(_: ControllerError) -> Self {
        EditorError::SurfaceBusy
    }
}

/// What the editor did with an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    /// Nothing to do (no binding, no selection, …).
    Ignored,
    /// Delete while a text object is in in-place editing: the host's text
    /// field owns the key.
    PassedToTextEditing,
}

enum Gesture {
    Drag {
        last: (f32, f32),
        changed: bool,
    },
    Resize {
        center: (f32, f32),
        start_offset: (f32, f32),
        start_scale: (f32, f32),
        free: bool,
        changed: bool,
    },
}

pub struct Editor {
    config: StudioConfig,
    controller: SideController,
    history: History,
    selection: Option<ObjectId>,
    clipboard: Option<PlaceableObject>,
    text_editing: bool,
    gesture: Option<Gesture>,
}

impl Editor {
    pub fn new(config: StudioConfig, mockups: SideAssets) -> Self {
        let controller = SideController::new(&config, mockups);
        let history = History::new(config.history_limit, controller.live().serialize());
        Self {
            config,
            controller,
            history,
            selection: None,
            clipboard: None,
            text_editing: false,
            gesture: None,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn controller(&self) -> &SideController {
        &self.controller
    }

    /// Mutable controller access for the export pipeline, which serializes
    /// itself against interaction via the exclusive flag.
    pub fn controller_mut(&mut self) -> &mut SideController {
        &mut self.controller
    }

    pub fn live(&self) -> &SideDocument {
        self.controller.live()
    }

    pub fn selection(&self) -> Option<ObjectId> {
        self.selection
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// In-place text editing mode: Delete is handed back to the host.
    pub fn set_text_editing(&mut self, editing: bool) {
        self.text_editing = editing;
    }

    // ─── Side switching ──────────────────────────────────────────────────

    /// Switch the working surface to `target`. Selection, gesture, and undo
    /// history belong to one side's document and reset with it.
    pub fn switch_side(&mut self, target: Side) -> Result<(), EditorError> {
        if target == self.controller.active() {
            return Ok(());
        }
        self.controller.switch_to(target)?;
        self.selection = None;
        self.gesture = None;
        self.history.reset(self.controller.live().serialize());
        Ok(())
    }

    // ─── Object creation ─────────────────────────────────────────────────

    pub fn add_text(&mut self, payload: TextPayload, x: f32, y: f32) -> Result<ObjectId, EditorError> {
        self.add_placeable(PlaceableObject::text(payload, Transform::at(x, y)))
    }

    pub fn add_shape(
        &mut self,
        payload: ShapePayload,
        x: f32,
        y: f32,
    ) -> Result<ObjectId, EditorError> {
        self.add_placeable(PlaceableObject::shape(payload, Transform::at(x, y)))
    }

    /// Place an image whose asset has already resolved. Callers keep
    /// unresolved images out of the document (placeholder or skip).
    pub fn add_image(
        &mut self,
        payload: ImagePayload,
        x: f32,
        y: f32,
    ) -> Result<ObjectId, EditorError> {
        self.add_placeable(PlaceableObject::image(payload, Transform::at(x, y)))
    }

    fn add_placeable(&mut self, object: PlaceableObject) -> Result<ObjectId, EditorError> {
        self.ensure_interactive()?;
        let id = self.controller.live_mut().add_object(object)?;
        self.selection = Some(id);
        self.checkpoint();
        Ok(id)
    }

    // ─── Event handling ──────────────────────────────────────────────────

    pub fn handle(&mut self, event: &InputEvent) -> Result<Outcome, EditorError> {
        self.ensure_interactive()?;
        match event {
            InputEvent::PointerDown { x, y, modifiers } => self.pointer_down(*x, *y, *modifiers),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(*x, *y),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Key { key, modifiers } => self.key(key, *modifiers),
        }
    }

    fn ensure_interactive(&self) -> Result<(), EditorError> {
        if self.controller.is_busy() {
            return Err(EditorError::SurfaceBusy);
        }
        Ok(())
    }

    fn pointer_down(&mut self, x: f32, y: f32, modifiers: Modifiers) -> Result<Outcome, EditorError> {
        // A press on a selection corner starts a resize.
        if let Some(id) = self.selection
            && let Some(obj) = self.live().object(id)
            && !obj.locked
            && let Some(_corner) = nearest_corner(&compute_bounds(obj), x, y)
        {
            let t = obj.transform;
            self.gesture = Some(Gesture::Resize {
                center: (t.x, t.y),
                start_offset: ((x - t.x).abs().max(1.0), (y - t.y).abs().max(1.0)),
                start_scale: (t.scale_x, t.scale_y),
                free: modifiers.alt,
                changed: false,
            });
            return Ok(Outcome::Handled);
        }

        match topmost_at(self.live(), x, y) {
            Some(id) => {
                self.selection = Some(id);
                let locked = self.live().object(id).is_some_and(|o| o.locked);
                if !locked {
                    self.gesture = Some(Gesture::Drag {
                        last: (x, y),
                        changed: false,
                    });
                }
                Ok(Outcome::Handled)
            }
            None => {
                self.selection = None;
                self.gesture = None;
                Ok(Outcome::Handled)
            }
        }
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> Result<Outcome, EditorError> {
        let Some(id) = self.selection else {
            return Ok(Outcome::Ignored);
        };
        let print_area = self.config.print_area;
        let surface_center = self.config.surface_center();
        let tolerance = self.config.snap_tolerance_px;

        match &mut self.gesture {
            Some(Gesture::Drag { last, changed }) => {
                let (dx, dy) = (x - last.0, y - last.1);
                *last = (x, y);
                *changed = true;
                if let Some(obj) = self.controller.live_mut().object_mut(id) {
                    obj.transform.x += dx;
                    obj.transform.y += dy;
                    clamp_into_rect(obj, print_area);
                    snap_to_center(obj, surface_center, tolerance);
                }
                Ok(Outcome::Handled)
            }
            Some(Gesture::Resize {
                center,
                start_offset,
                start_scale,
                free,
                changed,
            }) => {
                let fx = ((x - center.0).abs() / start_offset.0).max(MIN_SCALE);
                let fy = ((y - center.1).abs() / start_offset.1).max(MIN_SCALE);
                let (sx, sy) = if *free {
                    (start_scale.0 * fx, start_scale.1 * fy)
                } else {
                    // Aspect-preserving: one uniform factor from the larger pull.
                    let f = fx.max(fy);
                    (start_scale.0 * f, start_scale.1 * f)
                };
                *changed = true;
                if let Some(obj) = self.controller.live_mut().object_mut(id) {
                    obj.transform.scale_x = sx.max(MIN_SCALE);
                    obj.transform.scale_y = sy.max(MIN_SCALE);
                    clamp_into_rect(obj, print_area);
                }
                Ok(Outcome::Handled)
            }
            None => Ok(Outcome::Ignored),
        }
    }

    fn pointer_up(&mut self) -> Result<Outcome, EditorError> {
        let changed = matches!(
            self.gesture,
            Some(Gesture::Drag { changed: true, .. })
                | Some(Gesture::Resize { changed: true, .. })
        );
        self.gesture = None;
        if changed {
            self.checkpoint();
            return Ok(Outcome::Handled);
        }
        Ok(Outcome::Ignored)
    }

    fn key(&mut self, key: &str, modifiers: Modifiers) -> Result<Outcome, EditorError> {
        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return Ok(Outcome::Ignored);
        };
        if action == ShortcutAction::Delete && self.text_editing {
            return Ok(Outcome::PassedToTextEditing);
        }
        self.apply(action)
    }

    // ─── Actions ─────────────────────────────────────────────────────────

    pub fn apply(&mut self, action: ShortcutAction) -> Result<Outcome, EditorError> {
        self.ensure_interactive()?;
        match action {
            ShortcutAction::Undo => {
                let Some(state) = self.history.undo().cloned() else {
                    return Ok(Outcome::Ignored);
                };
                self.restore(&state);
                Ok(Outcome::Handled)
            }
            ShortcutAction::Redo => {
                let Some(state) = self.history.redo().cloned() else {
                    return Ok(Outcome::Ignored);
                };
                self.restore(&state);
                Ok(Outcome::Handled)
            }
            ShortcutAction::Delete => {
                let Some(id) = self.selection.take() else {
                    return Ok(Outcome::Ignored);
                };
                self.controller.live_mut().remove_object(id);
                self.checkpoint();
                Ok(Outcome::Handled)
            }
            ShortcutAction::Copy => {
                let Some(obj) = self.selection.and_then(|id| self.live().object(id).cloned())
                else {
                    return Ok(Outcome::Ignored);
                };
                self.clipboard = Some(obj);
                Ok(Outcome::Handled)
            }
            ShortcutAction::Cut => {
                if self.apply(ShortcutAction::Copy)? == Outcome::Ignored {
                    return Ok(Outcome::Ignored);
                }
                self.apply(ShortcutAction::Delete)
            }
            ShortcutAction::Paste => {
                let Some(stored) = &mut self.clipboard else {
                    return Ok(Outcome::Ignored);
                };
                // Cascade: each paste lands one offset further.
                stored.transform = stored
                    .transform
                    .translated(self.config.duplicate_offset_px, self.config.duplicate_offset_px);
                let mut clone = stored.clone();
                clone.id = ObjectId::fresh(clone.kind.name());
                let id = self.controller.live_mut().add_object(clone)?;
                self.selection = Some(id);
                self.checkpoint();
                Ok(Outcome::Handled)
            }
            ShortcutAction::Duplicate => {
                let Some(id) = self.selection else {
                    return Ok(Outcome::Ignored);
                };
                let Some(new_id) = self.controller.live_mut().duplicate_object(id) else {
                    return Ok(Outcome::Ignored);
                };
                self.selection = Some(new_id);
                self.checkpoint();
                Ok(Outcome::Handled)
            }
            ShortcutAction::ToggleLock => {
                let Some(id) = self.selection else {
                    return Ok(Outcome::Ignored);
                };
                let locked = self.live().object(id).is_some_and(|o| o.locked);
                self.controller.live_mut().set_locked(id, !locked);
                self.checkpoint();
                Ok(Outcome::Handled)
            }
            ShortcutAction::BringForward
            | ShortcutAction::SendBackward
            | ShortcutAction::BringToFront
            | ShortcutAction::SendToBack => {
                let Some(id) = self.selection else {
                    return Ok(Outcome::Ignored);
                };
                let reorder = match action {
                    ShortcutAction::BringForward => Reorder::Forward,
                    ShortcutAction::SendBackward => Reorder::Backward,
                    ShortcutAction::BringToFront => Reorder::Front,
                    _ => Reorder::Back,
                };
                if self.controller.live_mut().reorder(id, reorder) {
                    self.checkpoint();
                    Ok(Outcome::Handled)
                } else {
                    Ok(Outcome::Ignored)
                }
            }
            ShortcutAction::Deselect => {
                self.selection = None;
                Ok(Outcome::Handled)
            }
        }
    }

    fn restore(&mut self, state: &pod_core::Snapshot) {
        self.controller.live_mut().rehydrate(state);
        // The restored state may no longer contain the selection.
        if let Some(id) = self.selection
            && self.live().object(id).is_none()
        {
            self.selection = None;
        }
    }

    fn checkpoint(&mut self) {
        self.history.checkpoint(self.controller.live().serialize());
    }
}

/// Which corner of `bounds` (if any) is within handle range of the pointer.
fn nearest_corner(bounds: &pod_core::Rect, x: f32, y: f32) -> Option<usize> {
    let corners = [
        (bounds.x, bounds.y),
        (bounds.right(), bounds.y),
        (bounds.x, bounds.bottom()),
        (bounds.right(), bounds.bottom()),
    ];
    corners
        .iter()
        .position(|(cx, cy)| (x - cx).hypot(y - cy) <= HANDLE_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_core::model::{Color, ShapeGeometry};

    fn editor() -> Editor {
        Editor::new(StudioConfig::default(), SideAssets::default())
    }

    fn square(side: f32) -> ShapePayload {
        ShapePayload {
            geometry: ShapeGeometry::Rect {
                width: side,
                height: side,
                corner_radius: 0.0,
            },
            fill: Color::BLACK,
            stroke: Color::BLACK,
            stroke_width_px: 0.0,
        }
    }

    #[test]
    fn pointer_down_selects_and_empty_clears() {
        let mut e = editor();
        let id = e.add_shape(square(40.0), 250.0, 310.0).unwrap();

        e.handle(&InputEvent::pointer_down(250.0, 310.0)).unwrap();
        assert_eq!(e.selection(), Some(id));

        e.handle(&InputEvent::pointer_up(250.0, 310.0)).unwrap();
        e.handle(&InputEvent::pointer_down(20.0, 20.0)).unwrap();
        assert_eq!(e.selection(), None);
    }

    #[test]
    fn drag_clamps_into_print_area() {
        let mut e = editor();
        let id = e.add_shape(square(40.0), 250.0, 310.0).unwrap();
        let area = e.config().print_area;

        e.handle(&InputEvent::pointer_down(250.0, 310.0)).unwrap();
        // Pull far past the left edge of the print area
        e.handle(&InputEvent::pointer_move(-400.0, 310.0)).unwrap();
        e.handle(&InputEvent::pointer_up(-400.0, 310.0)).unwrap();

        let bounds = compute_bounds(e.live().object(id).unwrap());
        assert!(
            area.contains_rect(&bounds),
            "dragged object must stay inside the print area"
        );
    }

    #[test]
    fn drag_snaps_near_center() {
        let mut e = editor();
        let id = e.add_shape(square(40.0), 250.0, 310.0).unwrap();
        let (cx, cy) = e.config().surface_center();

        e.handle(&InputEvent::pointer_down(250.0, 310.0)).unwrap();
        // Land 4 px off the vertical center line: within the 10 px tolerance
        e.handle(&InputEvent::pointer_move(cx + 4.0, cy + 40.0)).unwrap();

        let t = e.live().object(id).unwrap().transform;
        assert_eq!(t.x, cx, "x must snap onto the center line");
        assert_eq!(t.y, cy + 40.0, "y stays free outside tolerance");
    }

    #[test]
    fn outside_object_clamped_on_first_move() {
        let mut e = editor();
        // Created far outside the print area (e.g. stale paste position)
        let id = e.add_shape(square(30.0), 20.0, 20.0).unwrap();
        let area = e.config().print_area;
        assert!(!area.contains_rect(&compute_bounds(e.live().object(id).unwrap())));

        e.handle(&InputEvent::pointer_down(20.0, 20.0)).unwrap();
        e.handle(&InputEvent::pointer_move(21.0, 20.0)).unwrap();

        assert!(
            area.contains_rect(&compute_bounds(e.live().object(id).unwrap())),
            "first interactive move must clamp the object into the print area"
        );
    }

    #[test]
    fn resize_preserves_aspect_by_default() {
        let mut e = editor();
        let id = e.add_shape(square(40.0), 250.0, 310.0).unwrap();

        e.handle(&InputEvent::pointer_down(250.0, 310.0)).unwrap();
        e.handle(&InputEvent::pointer_up(250.0, 310.0)).unwrap();

        // Grab the bottom-right corner handle and pull outward
        e.handle(&InputEvent::pointer_down(270.0, 330.0)).unwrap();
        e.handle(&InputEvent::pointer_move(290.0, 335.0)).unwrap();

        let t = e.live().object(id).unwrap().transform;
        assert_eq!(t.scale_x, t.scale_y, "aspect ratio must be preserved");
        assert!(t.scale_x > 1.0);
    }

    #[test]
    fn locked_object_selects_but_does_not_drag() {
        let mut e = editor();
        let id = e.add_shape(square(40.0), 250.0, 310.0).unwrap();
        e.controller_mut().live_mut().set_locked(id, true);

        e.handle(&InputEvent::pointer_down(250.0, 310.0)).unwrap();
        assert_eq!(e.selection(), Some(id));
        e.handle(&InputEvent::pointer_move(300.0, 310.0)).unwrap();

        assert_eq!(
            e.live().object(id).unwrap().transform.x,
            250.0,
            "locked object must not move"
        );
    }

    #[test]
    fn delete_passes_through_during_text_editing() {
        let mut e = editor();
        let id = e
            .add_text(TextPayload::new("HELLO", "Inter"), 250.0, 310.0)
            .unwrap();
        e.handle(&InputEvent::pointer_down(250.0, 310.0)).unwrap();

        e.set_text_editing(true);
        let outcome = e
            .handle(&InputEvent::key("Delete", Modifiers::NONE))
            .unwrap();
        assert_eq!(outcome, Outcome::PassedToTextEditing);
        assert!(e.live().object(id).is_some(), "object must survive");

        e.set_text_editing(false);
        e.handle(&InputEvent::key("Delete", Modifiers::NONE)).unwrap();
        assert!(e.live().object(id).is_none());
    }

    #[test]
    fn cut_copy_paste_single_slot() {
        let mut e = editor();
        let id = e.add_shape(square(40.0), 250.0, 310.0).unwrap();
        e.handle(&InputEvent::pointer_down(250.0, 310.0)).unwrap();

        e.apply(ShortcutAction::Cut).unwrap();
        assert!(e.live().is_empty());

        e.apply(ShortcutAction::Paste).unwrap();
        assert_eq!(e.live().len(), 1);
        let pasted = &e.live().objects()[0];
        assert_ne!(pasted.id, id, "paste mints a fresh id");
        assert_eq!(pasted.transform.x, 270.0, "paste offsets by the fixed delta");
        assert_eq!(pasted.transform.y, 330.0);
    }

    #[test]
    fn gesture_is_one_undo_step() {
        let mut e = editor();
        let id = e.add_shape(square(40.0), 250.0, 310.0).unwrap();

        e.handle(&InputEvent::pointer_down(250.0, 310.0)).unwrap();
        for i in 1..=5 {
            e.handle(&InputEvent::pointer_move(250.0 + i as f32 * 2.0, 310.0))
                .unwrap();
        }
        e.handle(&InputEvent::pointer_up(260.0, 310.0)).unwrap();

        e.apply(ShortcutAction::Undo).unwrap();
        assert_eq!(
            e.live().object(id).unwrap().transform.x,
            250.0,
            "one undo reverses the whole drag"
        );
    }

    #[test]
    fn busy_surface_rejects_input() {
        let mut e = editor();
        e.add_shape(square(40.0), 250.0, 310.0).unwrap();
        e.controller_mut().begin_exclusive().unwrap();

        let err = e.handle(&InputEvent::pointer_down(250.0, 310.0)).unwrap_err();
        assert!(matches!(err, EditorError::SurfaceBusy));
        let err = e.add_shape(square(10.0), 200.0, 200.0).unwrap_err();
        assert!(matches!(err, EditorError::SurfaceBusy));

        e.controller_mut().end_exclusive();
        assert!(e.handle(&InputEvent::pointer_down(250.0, 310.0)).is_ok());
    }
}
