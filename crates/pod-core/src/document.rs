//! Per-side document: an ordered scene list with snapshot semantics.
//!
//! Index 0 is the bottom of the z-order. The boundary and mockup system
//! objects are deliberately not representable here — they live in the render
//! surface spec — so snapshots and exports cannot contain them.

use crate::error::{DocumentError, InvalidObjectError};
use crate::id::ObjectId;
use crate::model::{PlaceableObject, Transform};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two independent design documents of one editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Front => write!(f, "front"),
            Side::Back => write!(f, "back"),
        }
    }
}

/// Z-order moves. Boundary positions are no-ops, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reorder {
    Forward,
    Backward,
    Front,
    Back,
}

/// Serialized copy of one side's placeable objects, in z-order.
///
/// Deep-copied both ways: mutating a snapshot never touches live state, and
/// rehydrating clones the snapshot's objects into the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub objects: Vec<PlaceableObject>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The live object list for one side of the garment.
#[derive(Debug, Clone)]
pub struct SideDocument {
    side: Side,
    objects: Vec<PlaceableObject>,
    /// Visual delta applied to duplicates and pastes.
    duplicate_offset: f32,
}

impl SideDocument {
    pub fn new(side: Side, duplicate_offset: f32) -> Self {
        Self {
            side,
            objects: Vec::new(),
            duplicate_offset,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn objects(&self) -> &[PlaceableObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&PlaceableObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut PlaceableObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Append a validated object at the top of the z-order.
    pub fn add_object(&mut self, object: PlaceableObject) -> Result<ObjectId, InvalidObjectError> {
        object.validate()?;
        let id = object.id;
        self.objects.push(object);
        log::debug!("{}: added {} ({} objects)", self.side, id, self.objects.len());
        Ok(id)
    }

    /// Remove by id. Deletion is idempotent: an absent id is a no-op.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(idx) => {
                self.objects.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Deep-clone an object under a fresh id, offset by the configured visual
    /// delta, inserted directly above its source in the z-order.
    pub fn duplicate_object(&mut self, id: ObjectId) -> Option<ObjectId> {
        let idx = self.index_of(id)?;
        let mut clone = self.objects[idx].clone();
        clone.id = ObjectId::fresh(clone.kind.name());
        clone.transform = clone
            .transform
            .translated(self.duplicate_offset, self.duplicate_offset);
        let new_id = clone.id;
        self.objects.insert(idx + 1, clone);
        Some(new_id)
    }

    /// Move an object within the z-order. Returns whether the order changed.
    pub fn reorder(&mut self, id: ObjectId, action: Reorder) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let top = self.objects.len() - 1;
        let target = match action {
            Reorder::Forward => (idx + 1).min(top),
            Reorder::Backward => idx.saturating_sub(1),
            Reorder::Front => top,
            Reorder::Back => 0,
        };
        if target == idx {
            return false;
        }
        let obj = self.objects.remove(idx);
        self.objects.insert(target, obj);
        true
    }

    /// Replace an object's transform. Locked objects reject the mutation.
    pub fn set_transform(
        &mut self,
        id: ObjectId,
        transform: Transform,
    ) -> Result<(), DocumentError> {
        let Some(obj) = self.object_mut(id) else {
            return Ok(());
        };
        if obj.locked {
            return Err(DocumentError::ObjectLocked(id));
        }
        if !transform.is_finite() {
            return Err(InvalidObjectError::NonFiniteTransform(id).into());
        }
        obj.transform = transform;
        Ok(())
    }

    pub fn set_opacity(&mut self, id: ObjectId, opacity: f32) -> Result<(), DocumentError> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(InvalidObjectError::OpacityOutOfRange(opacity).into());
        }
        if let Some(obj) = self.object_mut(id) {
            obj.opacity = opacity;
        }
        Ok(())
    }

    /// Lock toggles always apply — unlocking a locked object must work.
    pub fn set_locked(&mut self, id: ObjectId, locked: bool) {
        if let Some(obj) = self.object_mut(id) {
            obj.locked = locked;
        }
    }

    /// Deep-copy the design objects into a snapshot.
    pub fn serialize(&self) -> Snapshot {
        Snapshot {
            objects: self.objects.clone(),
        }
    }

    /// Replace the live list with deep clones of the snapshot's objects,
    /// preserving their saved ids and order.
    pub fn rehydrate(&mut self, snapshot: &Snapshot) {
        self.objects = snapshot.objects.clone();
    }

    /// Drop every object (side-switch discard).
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
