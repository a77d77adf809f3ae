//! View/side controller: exactly one side is live on the working surface.
//!
//! The controller owns the live `SideDocument`, the per-side stored
//! snapshots, and the `SurfaceSpec` whose mockup it swaps on switch. The
//! switch sequence is synchronous and therefore atomic from the caller's
//! perspective; the busy flag exists to serialize it against exports, which
//! hold the surface across await points.

use pod_core::{Side, SideDocument, Snapshot, SourceRef, StudioConfig};
use pod_render::SurfaceSpec;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("the working surface is busy with a side switch or export")]
    Busy,
}

/// Per-side garment mockup references, fixed for one session.
#[derive(Debug, Clone, Default)]
pub struct SideAssets {
    pub front: Option<SourceRef>,
    pub back: Option<SourceRef>,
}

impl SideAssets {
    pub fn for_side(&self, side: Side) -> Option<&SourceRef> {
        match side {
            Side::Front => self.front.as_ref(),
            Side::Back => self.back.as_ref(),
        }
    }
}

pub struct SideController {
    active: Side,
    live: SideDocument,
    saved_front: Option<Snapshot>,
    saved_back: Option<Snapshot>,
    surface: SurfaceSpec,
    mockups: SideAssets,
    duplicate_offset: f32,
    busy: bool,
}

impl SideController {
    pub fn new(config: &StudioConfig, mockups: SideAssets) -> Self {
        let mut surface = SurfaceSpec::from_config(config);
        surface.mockup = mockups.for_side(Side::Front).cloned();
        Self {
            active: Side::Front,
            live: SideDocument::new(Side::Front, config.duplicate_offset_px),
            saved_front: None,
            saved_back: None,
            surface,
            mockups,
            duplicate_offset: config.duplicate_offset_px,
            busy: false,
        }
    }

    pub fn active(&self) -> Side {
        self.active
    }

    pub fn live(&self) -> &SideDocument {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut SideDocument {
        &mut self.live
    }

    pub fn surface(&self) -> &SurfaceSpec {
        &self.surface
    }

    pub fn mockup_for(&self, side: Side) -> Option<&SourceRef> {
        self.mockups.for_side(side)
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Take exclusive ownership of the surface for a multi-step operation
    /// (export). While held, interaction mutations and plain switches are
    /// rejected.
    pub fn begin_exclusive(&mut self) -> Result<(), ControllerError> {
        if self.busy {
            return Err(ControllerError::Busy);
        }
        self.busy = true;
        Ok(())
    }

    pub fn end_exclusive(&mut self) {
        self.busy = false;
    }

    /// Make `target` the live side. No-op when already active.
    pub fn switch_to(&mut self, target: Side) -> Result<(), ControllerError> {
        if self.busy {
            return Err(ControllerError::Busy);
        }
        self.switch_unguarded(target);
        Ok(())
    }

    /// The switch sequence without the busy check — callers holding
    /// exclusivity (export) use this to flip sides mid-operation.
    pub fn switch_unguarded(&mut self, target: Side) {
        if target == self.active {
            return;
        }

        // 1. Snapshot the outgoing side.
        let outgoing = self.live.serialize();
        match self.active {
            Side::Front => self.saved_front = Some(outgoing),
            Side::Back => self.saved_back = Some(outgoing),
        }

        // 2–3. Discard live objects, swap the mockup.
        self.live = SideDocument::new(target, self.duplicate_offset);
        self.surface.mockup = self.mockups.for_side(target).cloned();

        // 4. Rehydrate the incoming side; first visit leaves it empty.
        let saved = match target {
            Side::Front => self.saved_front.as_ref(),
            Side::Back => self.saved_back.as_ref(),
        };
        if let Some(snapshot) = saved {
            self.live.rehydrate(snapshot);
        }

        // 5. Only now is the switch observable.
        self.active = target;
        log::debug!("switched working surface to {target}");
    }

    /// The design snapshot for `side`: the live serialization when active,
    /// the stored copy (empty if never visited) otherwise.
    pub fn snapshot_of(&self, side: Side) -> Snapshot {
        if side == self.active {
            return self.live.serialize();
        }
        let saved = match side {
            Side::Front => self.saved_front.as_ref(),
            Side::Back => self.saved_back.as_ref(),
        };
        saved.cloned().unwrap_or_default()
    }
}
