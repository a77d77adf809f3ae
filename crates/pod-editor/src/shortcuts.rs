//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s so hosts share
//! one binding table. Platform-aware: on macOS `meta` is ⌘, elsewhere
//! `ctrl` serves the same role.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    Copy,
    Cut,
    Paste,
    Duplicate,
    ToggleLock,

    // ── Z-order ──
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,

    // ── Selection ──
    Deselect,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action. Returns `None` for unbound combos.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.ctrl || modifiers.meta;

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            "z" | "Z" if cmd && modifiers.shift => Some(ShortcutAction::Redo),
            "z" | "Z" if cmd => Some(ShortcutAction::Undo),
            "y" | "Y" if cmd => Some(ShortcutAction::Redo),
            "c" | "C" if cmd => Some(ShortcutAction::Copy),
            "x" | "X" if cmd => Some(ShortcutAction::Cut),
            "v" | "V" if cmd => Some(ShortcutAction::Paste),
            "d" | "D" if cmd => Some(ShortcutAction::Duplicate),
            "l" | "L" if cmd => Some(ShortcutAction::ToggleLock),
            "]" if cmd && modifiers.shift => Some(ShortcutAction::BringToFront),
            "[" if cmd && modifiers.shift => Some(ShortcutAction::SendToBack),
            "]" if cmd => Some(ShortcutAction::BringForward),
            "[" if cmd => Some(ShortcutAction::SendBackward),
            _ => None,
        }
    }
}
