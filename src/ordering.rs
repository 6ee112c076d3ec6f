//! Position bookkeeping for columns within a board and tasks within a column.
//!
//! Every function here operates on an in-memory sibling list. Lists are
//! kept in display order; after any reorder or move the positions are
//! renumbered to `0..n-1` so iterating by ascending position always yields
//! the same order as the list itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrderingError {
    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Item {0} not found")]
    NotFound(String),
}

/// An entity ordered among its siblings by an integer position.
pub trait Positioned {
    fn id(&self) -> &str;
    fn position(&self) -> i32;
    fn set_position(&mut self, position: i32);
}

/// One entry of the batch sent to the backend after a reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: String,
    pub position: i32,
}

/// Stable sort by position; ties keep their current relative order.
pub fn sort_by_position<T: Positioned>(items: &mut [T]) {
    items.sort_by_key(|item| item.position());
}

pub fn renumber<T: Positioned>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index as i32);
    }
}

/// Position for an entity appended to the end of `items`.
pub fn next_position<T: Positioned>(items: &[T]) -> i32 {
    items.len() as i32
}

pub fn index_of<T: Positioned>(items: &[T], id: &str) -> Result<usize, OrderingError> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| OrderingError::NotFound(id.to_string()))
}

/// Removes the item at `from` and reinserts it at `to`, then renumbers the
/// whole list. `to` past the end is clamped to the last index.
pub fn reorder<T: Positioned>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), OrderingError> {
    if from >= items.len() {
        return Err(OrderingError::IndexOutOfRange {
            index: from,
            len: items.len(),
        });
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    renumber(items);
    Ok(())
}

/// Same-list move. Kept separate from `reorder` so callers read naturally;
/// the item is removed before it is reinserted, so it never appears twice.
pub fn move_within<T: Positioned>(
    items: &mut Vec<T>,
    from: usize,
    to: usize,
) -> Result<(), OrderingError> {
    reorder(items, from, to)
}

/// Moves the item at `from` in `source` to index `to` of `target`
/// (clamped to `target.len()`), renumbering both lists. Returns a mutable
/// handle to the moved item so the caller can re-parent it.
pub fn move_between<'a, T: Positioned>(
    source: &mut Vec<T>,
    target: &'a mut Vec<T>,
    from: usize,
    to: usize,
) -> Result<&'a mut T, OrderingError> {
    if from >= source.len() {
        return Err(OrderingError::IndexOutOfRange {
            index: from,
            len: source.len(),
        });
    }
    let item = source.remove(from);
    let to = to.min(target.len());
    target.insert(to, item);
    renumber(source);
    renumber(target);
    Ok(&mut target[to])
}

pub fn position_updates<T: Positioned>(items: &[T]) -> Vec<PositionUpdate> {
    items
        .iter()
        .map(|item| PositionUpdate {
            id: item.id().to_string(),
            position: item.position(),
        })
        .collect()
}

/// True when positions are exactly `0..n-1` in list order.
pub fn is_contiguous<T: Positioned>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.position() == index as i32)
}
