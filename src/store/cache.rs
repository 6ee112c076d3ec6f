//! Per-collection fetch bookkeeping.
//!
//! Replaces a one-shot "has fetched" flag: each collection key moves
//! through `Unfetched -> Loading -> Fresh`, and a mutation that could not be
//! confirmed marks it `Stale` so the next fetch goes back to the server.

use std::collections::HashMap;

use crate::models::{BoardId, ColumnId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheState {
    #[default]
    Unfetched,
    Loading,
    Fresh,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Boards,
    Columns(BoardId),
    Tasks(ColumnId),
    AllTasks,
    Members(BoardId),
    Notifications,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceCache {
    entries: HashMap<ResourceKey, CacheState>,
}

impl ResourceCache {
    pub fn state(&self, key: &ResourceKey) -> CacheState {
        self.entries.get(key).copied().unwrap_or_default()
    }

    /// False while a request is in flight or the data is fresh.
    pub fn should_fetch(&self, key: &ResourceKey) -> bool {
        matches!(self.state(key), CacheState::Unfetched | CacheState::Stale)
    }

    pub fn mark_loading(&mut self, key: ResourceKey) {
        self.entries.insert(key, CacheState::Loading);
    }

    pub fn mark_fresh(&mut self, key: ResourceKey) {
        self.entries.insert(key, CacheState::Fresh);
    }

    pub fn mark_failed(&mut self, key: ResourceKey) {
        self.entries.remove(&key);
    }

    /// Only collections that were fetched can go stale.
    pub fn mark_stale(&mut self, key: &ResourceKey) {
        if let Some(state) = self.entries.get_mut(key) {
            if *state != CacheState::Unfetched {
                *state = CacheState::Stale;
            }
        }
    }

    pub fn forget(&mut self, key: &ResourceKey) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
