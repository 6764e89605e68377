use std::fmt;

use crate::normalize_folder_name;

/// Items are keyed by their raw local folder name.
pub type ItemId = String;
/// Identifier of a resolved remote video.
pub type RemoteId = String;
/// Identifier of a remote playlist.
pub type CollectionId = String;

/// Per-item import state. The remote id and the failure reason live inside
/// the variants that own them, so an item can never carry a remote id while
/// pending or a reason while added.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImportState {
    #[default]
    Pending,
    Searching,
    Adding { remote_id: RemoteId },
    Added { remote_id: RemoteId },
    Failed { reason: String },
}

impl ImportState {
    pub fn status(&self) -> ImportStatus {
        match self {
            ImportState::Pending => ImportStatus::Pending,
            ImportState::Searching => ImportStatus::Searching,
            ImportState::Adding { .. } => ImportStatus::Adding,
            ImportState::Added { .. } => ImportStatus::Added,
            ImportState::Failed { .. } => ImportStatus::Failed,
        }
    }

    pub fn remote_id(&self) -> Option<&str> {
        match self {
            ImportState::Adding { remote_id } | ImportState::Added { remote_id } => {
                Some(remote_id)
            }
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ImportState::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportState::Added { .. } | ImportState::Failed { .. })
    }

    /// Forward-only transition table for a single pass.
    pub(crate) fn can_advance_to(&self, next: &ImportState) -> bool {
        match (self, next) {
            (ImportState::Pending, ImportState::Searching) => true,
            (ImportState::Searching, ImportState::Adding { .. }) => true,
            (ImportState::Searching | ImportState::Adding { .. }, ImportState::Failed { .. }) => {
                true
            }
            (ImportState::Adding { remote_id }, ImportState::Added { remote_id: added }) => {
                remote_id == added
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportStatus {
    Pending,
    Searching,
    Adding,
    Added,
    Failed,
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImportStatus::Pending => "pending",
            ImportStatus::Searching => "searching",
            ImportStatus::Adding => "adding",
            ImportStatus::Added => "added",
            ImportStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportItem {
    id: ItemId,
    raw_name: String,
    normalized_name: String,
    state: ImportState,
}

impl ImportItem {
    /// Creates a pending item from a raw folder name.
    pub fn new(raw_name: impl Into<String>) -> Self {
        let raw_name = raw_name.into();
        let normalized_name = normalize_folder_name(&raw_name);
        Self {
            id: raw_name.clone(),
            raw_name,
            normalized_name,
            state: ImportState::Pending,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn status(&self) -> ImportStatus {
        self.state.status()
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.state.remote_id()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.state.failure_reason()
    }

    pub(crate) fn set_state(&mut self, state: ImportState) {
        self.state = state;
    }
}
