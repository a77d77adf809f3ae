//! Undo/redo: linear history of whole-document checkpoints.
//!
//! Every committed mutation (gesture release, delete, paste, layering, …)
//! pushes a full snapshot of the active side. Undoing then making a new
//! mutation discards all forward states — standard branch truncation.
//! Depth is capped to bound memory.

use pod_core::Snapshot;

pub struct History {
    states: Vec<Snapshot>,
    /// Index of the current state in `states`.
    cursor: usize,
    limit: usize,
}

impl History {
    /// Start a history at `initial` (the document's state before any edit).
    pub fn new(limit: usize, initial: Snapshot) -> Self {
        Self {
            states: vec![initial],
            cursor: 0,
            limit: limit.max(2),
        }
    }

    /// Record a new checkpoint, discarding any redo states beyond the
    /// cursor. Identical consecutive states are not recorded.
    pub fn checkpoint(&mut self, state: Snapshot) {
        if self.states[self.cursor] == state {
            return;
        }
        self.states.truncate(self.cursor + 1);
        self.states.push(state);
        if self.states.len() > self.limit {
            self.states.remove(0);
        }
        self.cursor = self.states.len() - 1;
    }

    /// Step back one state. Returns the state to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.states[self.cursor])
    }

    /// Step forward one state. Returns the state to restore.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.states.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.states[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.states.len()
    }

    /// Forget everything and restart at `initial` (side switch).
    pub fn reset(&mut self, initial: Snapshot) {
        self.states.clear();
        self.states.push(initial);
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_core::model::{PlaceableObject, TextPayload, Transform};

    /// One text object moved to `x` — a cheap distinguishable state.
    fn state(x: f32) -> Snapshot {
        let mut obj =
            PlaceableObject::text(TextPayload::new("state", "Inter"), Transform::at(x, 0.0));
        obj.id = pod_core::ObjectId::intern("history_probe");
        Snapshot { objects: vec![obj] }
    }

    #[test]
    fn undo_then_redo() {
        let mut h = History::new(50, Snapshot::default());
        h.checkpoint(state(1.0));
        h.checkpoint(state(2.0));

        assert_eq!(h.undo().cloned(), Some(state(1.0)));
        assert!(h.can_redo());
        assert_eq!(h.redo().cloned(), Some(state(2.0)));
        assert!(!h.can_redo());
    }

    #[test]
    fn new_checkpoint_truncates_redo() {
        let mut h = History::new(50, Snapshot::default());
        h.checkpoint(state(1.0));
        h.checkpoint(state(2.0));
        h.undo();
        assert!(h.can_redo());

        h.checkpoint(state(3.0));
        assert!(!h.can_redo(), "redo history must be discarded");
    }

    #[test]
    fn depth_cap_drops_oldest() {
        let mut h = History::new(3, Snapshot::default());
        for x in [1.0, 2.0, 3.0, 4.0] {
            h.checkpoint(state(x));
        }
        let mut undos = 0;
        while h.undo().is_some() {
            undos += 1;
        }
        assert_eq!(undos, 2, "only limit-1 undo steps remain");
    }

    #[test]
    fn duplicate_checkpoint_is_skipped() {
        let mut h = History::new(50, Snapshot::default());
        h.checkpoint(state(1.0));
        h.checkpoint(state(1.0));
        h.undo();
        assert!(!h.can_undo(), "identical state must not create a second step");
    }

    #[test]
    fn empty_history_has_no_steps() {
        let mut h = History::new(50, Snapshot::default());
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
    }
}
