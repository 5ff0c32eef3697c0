pub mod history;
pub mod reorder;
pub mod state;

pub use history::History;
pub use reorder::{DragAction, DragEvent, DropPosition, apply_move, remove_with_reflow};
pub use state::BuilderState;
