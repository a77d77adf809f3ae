//! Input abstraction layer.
//!
//! Normalizes host pointer and keyboard events into a unified `InputEvent`
//! enum consumed by the interaction layer. The host (web canvas, desktop
//! shell) is responsible for translating native events into these.

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// A normalized input event from any pointing device or keyboard.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown { x: f32, y: f32, modifiers: Modifiers },
    /// Pointer moved while tracked.
    PointerMove { x: f32, y: f32, modifiers: Modifiers },
    /// Pointer released.
    PointerUp { x: f32, y: f32, modifiers: Modifiers },
    /// Keyboard key, `key` as in `KeyboardEvent.key` (e.g. `"z"`, `"Delete"`).
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. } => Some((*x, *y)),
            Self::Key { .. } => None,
        }
    }
}
