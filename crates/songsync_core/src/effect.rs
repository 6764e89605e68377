use crate::{CollectionId, ItemStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RunImport {
        target: CollectionId,
        items: ItemStore,
        mode: PassMode,
    },
    CancelImport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// Process every item that is not yet added.
    Normal,
    /// Reset failed items to pending first.
    RetryFailed,
}
