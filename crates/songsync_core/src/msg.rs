use crate::{CollectionId, ItemProgress, ItemStore, PassSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Local scan produced a fresh list of raw song folder names.
    FoldersScanned(Vec<String>),
    /// User picked the playlist that receives the songs.
    CollectionSelected(CollectionId),
    /// User asked to add the batch to the selected playlist.
    ImportRequested,
    /// User asked to re-attempt every failed item.
    RetryFailedRequested,
    /// User asked to stop the running import.
    CancelRequested,
    /// Pipeline progress for one item.
    ItemProgress(ItemProgress),
    /// Pipeline status line that is not tied to a single item.
    StatusChanged(String),
    /// Pipeline finished a pass; `items` is its final view of the batch.
    ImportFinished {
        items: ItemStore,
        summary: PassSummary,
    },
    /// Pipeline refused to start (e.g. not signed in).
    ImportRejected(String),
    /// Fallback for placeholder wiring.
    NoOp,
}
