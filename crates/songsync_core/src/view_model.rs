use crate::{
    CollectionId, ImportItem, ImportStatus, ItemId, PassSummary, RemoteId, SessionState,
    StatusCounts,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub status_line: String,
    pub target: Option<CollectionId>,
    pub items: Vec<ItemRowView>,
    pub counts: StatusCounts,
    pub last_error: Option<String>,
    pub last_summary: Option<PassSummary>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRowView {
    pub id: ItemId,
    pub raw_name: String,
    pub normalized_name: String,
    pub status: ImportStatus,
    pub remote_id: Option<RemoteId>,
    pub failure_reason: Option<String>,
}

impl From<&ImportItem> for ItemRowView {
    fn from(item: &ImportItem) -> Self {
        Self {
            id: item.id().to_string(),
            raw_name: item.raw_name().to_string(),
            normalized_name: item.normalized_name().to_string(),
            status: item.status(),
            remote_id: item.remote_id().map(ToOwned::to_owned),
            failure_reason: item.failure_reason().map(ToOwned::to_owned),
        }
    }
}
