pub mod controller;
pub mod history;
pub mod input;
pub mod interaction;
pub mod shortcuts;

pub use controller::{ControllerError, SideAssets, SideController};
pub use history::History;
pub use input::{InputEvent, Modifiers};
pub use interaction::{Editor, EditorError, Outcome};
pub use shortcuts::{ShortcutAction, ShortcutMap};
