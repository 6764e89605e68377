use std::collections::HashMap;

use thiserror::Error;

use crate::{ImportItem, ImportState, ImportStatus, ItemId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown item id {0:?}")]
    UnknownItem(ItemId),
    #[error("item {id:?} cannot move from {from} to {to}")]
    InvalidTransition {
        id: ItemId,
        from: ImportStatus,
        to: ImportStatus,
    },
}

/// Ordered batch of import items, addressed by id.
///
/// Order is discovery order and never changes; updates only touch the
/// addressed item's state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemStore {
    items: Vec<ImportItem>,
    index: HashMap<ItemId, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_flight: usize,
    pub added: usize,
    pub failed: usize,
}

impl StatusCounts {
    /// Items a new pass would still touch.
    pub fn remaining(&self) -> usize {
        self.pending + self.in_flight + self.failed
    }
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh batch from raw folder names. Blank names are dropped and
    /// duplicates collapse into their first occurrence.
    pub fn collect<I, S>(raw_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        for raw in raw_names {
            let raw = raw.into();
            if raw.trim().is_empty() || store.index.contains_key(&raw) {
                continue;
            }
            store.push(ImportItem::new(raw));
        }
        store
    }

    fn push(&mut self, item: ImportItem) {
        self.index.insert(item.id().to_string(), self.items.len());
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in discovery order.
    pub fn all(&self) -> &[ImportItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&ImportItem> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    /// Replaces the addressed item's state, enforcing forward-only transitions.
    pub fn update(&mut self, id: &str, state: ImportState) -> Result<(), StoreError> {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| StoreError::UnknownItem(id.to_string()))?;
        let item = &mut self.items[pos];
        if !item.state().can_advance_to(&state) {
            return Err(StoreError::InvalidTransition {
                id: id.to_string(),
                from: item.status(),
                to: state.status(),
            });
        }
        item.set_state(state);
        Ok(())
    }

    /// Moves every failed item back to pending so a new pass re-attempts it.
    /// Returns how many items were reset.
    pub fn reset_failed(&mut self) -> usize {
        let mut reset = 0;
        for item in &mut self.items {
            if item.status() == ImportStatus::Failed {
                item.set_state(ImportState::Pending);
                reset += 1;
            }
        }
        reset
    }

    pub fn counts(&self) -> StatusCounts {
        self.items
            .iter()
            .fold(StatusCounts::default(), |mut counts, item| {
                match item.status() {
                    ImportStatus::Pending => counts.pending += 1,
                    ImportStatus::Searching | ImportStatus::Adding => counts.in_flight += 1,
                    ImportStatus::Added => counts.added += 1,
                    ImportStatus::Failed => counts.failed += 1,
                }
                counts
            })
    }
}
