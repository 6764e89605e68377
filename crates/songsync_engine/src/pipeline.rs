use std::sync::Arc;
use std::time::Duration;

use songsync_core::{
    ImportState, ImportStatus, ItemId, ItemProgress, ItemStore, PassSummary, StoreError,
};
use songsync_logging::{sync_debug, sync_info, sync_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{CatalogClient, ImportEvent, ProgressSink};

/// Failure reason recorded when the search returns nothing.
pub const NO_MATCH_REASON: &str = "no match found";
pub const ALL_PROCESSED_MESSAGE: &str = "All songs processed.";
pub const CANCELLED_MESSAGE: &str = "Import cancelled.";

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Pause between two processed songs, regardless of their outcome.
    pub item_delay: Duration,
    /// Extra search term that biases results towards audio uploads.
    pub query_hint: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            item_delay: Duration::from_secs(1),
            query_hint: "audio".to_string(),
        }
    }
}

/// Errors that stop a pass before or while it runs. Per-song failures are
/// recorded on the item instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("not signed in to the catalog service")]
    NotAuthenticated,
    #[error("no target playlist selected")]
    NoTargetCollection,
    #[error("nothing to import: the batch is empty")]
    EmptyBatch,
    #[error("item store out of sync: {0}")]
    Store(#[from] StoreError),
    #[error("import pass aborted: {0}")]
    Aborted(String),
}

/// Drives a batch of songs through search and append, one song at a time.
pub struct ImportPipeline {
    catalog: Arc<dyn CatalogClient>,
    settings: PipelineSettings,
}

impl ImportPipeline {
    pub fn new(catalog: Arc<dyn CatalogClient>, settings: PipelineSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogClient> {
        &self.catalog
    }

    /// Runs one pass over `store` in stored order. Pending songs are resolved
    /// and appended to `target`; added and failed songs are left alone.
    pub async fn run_pass(
        &self,
        target: &str,
        store: &mut ItemStore,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<PassSummary, ImportError> {
        self.check_preconditions(target, store)?;
        sync_info!(
            "Import pass started: {} songs, target playlist {}",
            store.len(),
            target
        );

        let ids: Vec<ItemId> = store.all().iter().map(|item| item.id().to_string()).collect();
        let mut summary = PassSummary::default();
        let mut paced = false;

        for id in ids {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            let item = store
                .get(&id)
                .ok_or_else(|| StoreError::UnknownItem(id.clone()))?;
            if item.state() != &ImportState::Pending {
                sync_debug!("Skipping {} ({})", id, item.status());
                summary.skipped += 1;
                continue;
            }
            let name = item.normalized_name().to_string();

            if paced && !self.pace(cancel).await {
                summary.cancelled = true;
                break;
            }
            paced = true;

            match self.process_item(target, &id, &name, store, sink).await? {
                ImportStatus::Added => summary.added += 1,
                _ => summary.failed += 1,
            }
            summary.processed += 1;
        }

        let message = if summary.cancelled {
            CANCELLED_MESSAGE
        } else {
            ALL_PROCESSED_MESSAGE
        };
        sync_info!(
            "Import pass finished: processed={} added={} failed={} skipped={} cancelled={}",
            summary.processed,
            summary.added,
            summary.failed,
            summary.skipped,
            summary.cancelled
        );
        sink.emit(ImportEvent::Status(message.to_string()));
        sink.emit(ImportEvent::Finished(summary));
        Ok(summary)
    }

    /// Explicit retry entry point: failed songs go back to pending, then a
    /// regular pass runs.
    pub async fn retry_failed(
        &self,
        target: &str,
        store: &mut ItemStore,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<PassSummary, ImportError> {
        self.check_preconditions(target, store)?;
        let reset = store.reset_failed();
        sync_info!("Retrying {} failed songs", reset);
        self.run_pass(target, store, sink, cancel).await
    }

    fn check_preconditions(&self, target: &str, store: &ItemStore) -> Result<(), ImportError> {
        if target.trim().is_empty() {
            return Err(ImportError::NoTargetCollection);
        }
        if store.is_empty() {
            return Err(ImportError::EmptyBatch);
        }
        if !self.catalog.is_authenticated() {
            return Err(ImportError::NotAuthenticated);
        }
        Ok(())
    }

    async fn process_item(
        &self,
        target: &str,
        id: &str,
        name: &str,
        store: &mut ItemStore,
        sink: &dyn ProgressSink,
    ) -> Result<ImportStatus, ImportError> {
        transition(
            store,
            sink,
            id,
            ImportState::Searching,
            format!("Searching for: {name}..."),
        )?;

        let hit = match self.catalog.search(&self.search_query(name)).await {
            Ok(Some(hit)) => hit,
            Ok(None) => {
                return fail(
                    store,
                    sink,
                    id,
                    NO_MATCH_REASON.to_string(),
                    format!("Could not find {name}."),
                );
            }
            Err(err) => {
                let reason = err.failure_reason();
                let message = format!("Error searching for {name}: {reason}");
                return fail(store, sink, id, reason, message);
            }
        };

        sync_debug!("Resolved {} to {} ({})", name, hit.id, hit.title);
        transition(
            store,
            sink,
            id,
            ImportState::Adding {
                remote_id: hit.id.clone(),
            },
            format!("Adding {name} to playlist..."),
        )?;

        match self.catalog.append_to_collection(target, &hit.id).await {
            Ok(()) => {
                transition(
                    store,
                    sink,
                    id,
                    ImportState::Added { remote_id: hit.id },
                    format!("{name} added successfully."),
                )?;
                Ok(ImportStatus::Added)
            }
            Err(err) => {
                let reason = err.failure_reason();
                let message = format!("Error adding {name}: {reason}");
                fail(store, sink, id, reason, message)
            }
        }
    }

    fn search_query(&self, name: &str) -> String {
        let hint = self.settings.query_hint.trim();
        if hint.is_empty() {
            name.to_string()
        } else {
            format!("{name} {hint}")
        }
    }

    /// Waits the inter-song delay. Returns false if cancelled meanwhile.
    async fn pace(&self, cancel: &CancellationToken) -> bool {
        if self.settings.item_delay.is_zero() {
            return !cancel.is_cancelled();
        }
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.settings.item_delay) => true,
        }
    }
}

fn transition(
    store: &mut ItemStore,
    sink: &dyn ProgressSink,
    id: &str,
    state: ImportState,
    message: String,
) -> Result<(), ImportError> {
    store.update(id, state.clone())?;
    sink.emit(ImportEvent::Item(ItemProgress {
        item_id: id.to_string(),
        state,
        message,
    }));
    Ok(())
}

fn fail(
    store: &mut ItemStore,
    sink: &dyn ProgressSink,
    id: &str,
    reason: String,
    message: String,
) -> Result<ImportStatus, ImportError> {
    sync_warn!("{}", message);
    transition(store, sink, id, ImportState::Failed { reason }, message)?;
    Ok(ImportStatus::Failed)
}
