use crate::{ImportState, ImportStatus, ItemId};

/// One reported item transition plus the human-readable status line that
/// goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemProgress {
    pub item_id: ItemId,
    pub state: ImportState,
    pub message: String,
}

impl ItemProgress {
    pub fn status(&self) -> ImportStatus {
        self.state.status()
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.state.remote_id()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.state.failure_reason()
    }
}

/// Outcome counters for one pass over a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassSummary {
    pub processed: usize,
    pub added: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cancelled: bool,
}
