//! Drag and drop gesture tracking.
//!
//! The presentation layer forwards raw gesture events (start, hover over a
//! slot, leave, drop) to a `DragController`. On drop the controller turns
//! the gesture into a `DropCommand` for `Store::apply_drop`.

use crate::models::{BoardId, ColumnId, TaskId};

/// What is being dragged, with its index in the list it was picked from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragItem {
    Column {
        board_id: BoardId,
        index: usize,
    },
    Task {
        task_id: TaskId,
        column_id: ColumnId,
        index: usize,
    },
}

/// Where the pointer currently is. `slot` is the gap between visible items
/// before anything is removed: 0 is above the first item, `len` below the
/// last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropTarget {
    ColumnSlot { board_id: BoardId, slot: usize },
    TaskSlot { column_id: ColumnId, slot: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropCommand {
    ReorderColumns {
        board_id: BoardId,
        from: usize,
        to: usize,
    },
    MoveTask {
        task_id: TaskId,
        source_column_id: ColumnId,
        target_column_id: ColumnId,
        new_position: usize,
    },
}

#[derive(Clone, Debug, Default)]
pub struct DragController {
    dragging: Option<DragItem>,
    target: Option<DropTarget>,
}

/// Converts a slot in the list the item is leaving into its index after
/// removal.
fn slot_to_index(from: usize, slot: usize) -> usize {
    if slot > from {
        slot - 1
    } else {
        slot
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> Option<&DragItem> {
        self.dragging.as_ref()
    }

    pub fn target(&self) -> Option<&DropTarget> {
        self.target.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    pub fn start(&mut self, item: DragItem) {
        self.dragging = Some(item);
        self.target = None;
    }

    /// Ignored unless a drag is in progress.
    pub fn hover(&mut self, target: DropTarget) {
        if self.dragging.is_some() {
            self.target = Some(target);
        }
    }

    pub fn leave(&mut self) {
        self.target = None;
    }

    pub fn cancel(&mut self) {
        self.dragging = None;
        self.target = None;
    }

    /// Ends the gesture. Returns `None` when there was no drag, no target,
    /// the target does not accept the dragged kind, or nothing would move.
    pub fn release(&mut self) -> Option<DropCommand> {
        let dragging = self.dragging.take()?;
        let target = self.target.take()?;

        match (dragging, target) {
            (
                DragItem::Column { board_id, index },
                DropTarget::ColumnSlot {
                    board_id: target_board,
                    slot,
                },
            ) if board_id == target_board => {
                let to = slot_to_index(index, slot);
                (to != index).then_some(DropCommand::ReorderColumns {
                    board_id,
                    from: index,
                    to,
                })
            }
            (
                DragItem::Task {
                    task_id,
                    column_id,
                    index,
                },
                DropTarget::TaskSlot {
                    column_id: target_column,
                    slot,
                },
            ) => {
                let same_column = column_id == target_column;
                let new_position = if same_column {
                    slot_to_index(index, slot)
                } else {
                    slot
                };
                if same_column && new_position == index {
                    return None;
                }
                Some(DropCommand::MoveTask {
                    task_id,
                    source_column_id: column_id,
                    target_column_id: target_column,
                    new_position,
                })
            }
            _ => None,
        }
    }
}
