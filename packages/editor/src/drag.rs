//! Drag-and-drop state machine.
//!
//! ```text
//! Idle ──drag_start(type)──▶ Dragging { type } ──drag_end(target)──▶ Idle
//!                                    │                  │
//!                                    └──drag_end(None)──┘ (cancelled)
//! ```
//!
//! Ending a drag over a drop zone yields an `InsertBlock` mutation carrying a
//! fresh instance of the dragged type; where it lands is decided when the
//! mutation is applied.

use crate::{EditorError, Mutation};
use formwork_blocks::BlockTypeRegistry;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { block_type: String },
}

/// Result of ending a drag
#[derive(Debug, Clone, PartialEq)]
pub enum DropAction {
    /// Released outside any drop zone, or nothing was being dragged
    Cancelled,
    Insert(Mutation),
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pick up a palette entry. Only registered types can be dragged.
    pub fn drag_start(&mut self, registry: &BlockTypeRegistry, type_id: &str) -> Result<(), EditorError> {
        if !registry.is_known(type_id) {
            return Err(EditorError::UnknownBlockType(type_id.to_string()));
        }

        debug!(block_type = type_id, "Drag started");
        self.state = DragState::Dragging {
            block_type: type_id.to_string(),
        };
        Ok(())
    }

    /// Release the dragged block over `target`, or cancel with `None`
    pub fn drag_end(&mut self, registry: &BlockTypeRegistry, target: Option<&str>) -> DropAction {
        let DragState::Dragging { block_type } = std::mem::take(&mut self.state) else {
            return DropAction::Cancelled;
        };

        let (Some(target), Some(descriptor)) = (target, registry.describe(&block_type)) else {
            debug!(block_type = %block_type, "Drag cancelled");
            return DropAction::Cancelled;
        };

        debug!(block_type = %block_type, drop_target = target, "Drag ended over drop zone");
        DropAction::Insert(Mutation::InsertBlock {
            target: target.to_string(),
            block: descriptor.create_block(),
        })
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
