use crate::view_model::{AppViewModel, ItemRowView};
use crate::{CollectionId, ItemStore, PassSummary};

pub(crate) const IDLE_STATUS: &str = "Waiting for import to start...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Cancelling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    session: SessionState,
    items: ItemStore,
    target: Option<CollectionId>,
    status_line: String,
    last_error: Option<String>,
    last_summary: Option<PassSummary>,
    /// Batch as it was before a retry reset its failed items.
    pre_retry_items: Option<ItemStore>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: SessionState::Idle,
            items: ItemStore::new(),
            target: None,
            status_line: IDLE_STATUS.to_string(),
            last_error: None,
            last_summary: None,
            pre_retry_items: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            status_line: self.status_line.clone(),
            target: self.target.clone(),
            items: self.items.all().iter().map(ItemRowView::from).collect(),
            counts: self.items.counts(),
            last_error: self.last_error.clone(),
            last_summary: self.last_summary,
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn items_mut(&mut self) -> &mut ItemStore {
        self.mark_dirty();
        &mut self.items
    }

    pub(crate) fn replace_items(&mut self, items: ItemStore) {
        self.items = items;
        self.mark_dirty();
    }

    pub(crate) fn stash_items(&mut self) {
        self.pre_retry_items = Some(self.items.clone());
    }

    pub(crate) fn take_stashed_items(&mut self) -> Option<ItemStore> {
        self.pre_retry_items.take()
    }

    pub(crate) fn set_session(&mut self, session: SessionState) {
        self.session = session;
        self.mark_dirty();
    }

    pub(crate) fn set_target(&mut self, target: CollectionId) {
        self.target = Some(target);
        self.mark_dirty();
    }

    pub(crate) fn set_status_line(&mut self, line: impl Into<String>) {
        self.status_line = line.into();
        self.mark_dirty();
    }

    pub(crate) fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
        self.mark_dirty();
    }

    pub(crate) fn clear_error(&mut self) {
        if self.last_error.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_summary(&mut self, summary: PassSummary) {
        self.last_summary = Some(summary);
        self.mark_dirty();
    }
}
