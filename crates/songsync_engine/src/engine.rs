use std::sync::Arc;

use songsync_core::{CollectionId, ItemStore, PassMode, PassSummary};
use songsync_logging::sync_error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::{ChannelProgressSink, ImportError, ImportEvent, ImportPipeline};

#[derive(Debug)]
pub enum EngineEvent {
    Progress(ImportEvent),
    /// A pass ended; `items` is the pipeline's final copy of the batch.
    PassCompleted {
        items: ItemStore,
        result: Result<PassSummary, ImportError>,
    },
}

/// Runs import passes on the tokio runtime and hands their events back.
pub struct EngineHandle {
    pipeline: Arc<ImportPipeline>,
    event_tx: UnboundedSender<EngineEvent>,
    event_rx: UnboundedReceiver<EngineEvent>,
    cancel: Option<CancellationToken>,
}

impl EngineHandle {
    pub fn new(pipeline: ImportPipeline) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            pipeline: Arc::new(pipeline),
            event_tx,
            event_rx,
            cancel: None,
        }
    }

    /// Spawns a pass over `items`. Must be called from within a tokio runtime.
    ///
    /// A `PassCompleted` event is always sent, also when the pass task panics;
    /// the untouched batch is handed back in that case.
    pub fn start(&mut self, target: CollectionId, items: ItemStore, mode: PassMode) {
        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());
        let pipeline = self.pipeline.clone();
        let event_tx = self.event_tx.clone();
        let batch = items.clone();

        let sink = ChannelProgressSink::new(event_tx.clone());
        let pass = tokio::spawn(async move {
            let mut items = items;
            let result = match mode {
                PassMode::Normal => pipeline.run_pass(&target, &mut items, &sink, &cancel).await,
                PassMode::RetryFailed => {
                    pipeline
                        .retry_failed(&target, &mut items, &sink, &cancel)
                        .await
                }
            };
            (items, result)
        });

        tokio::spawn(async move {
            let (items, result) = match pass.await {
                Ok(done) => done,
                Err(err) => {
                    sync_error!("Import pass aborted: {}", err);
                    (batch, Err(ImportError::Aborted(err.to_string())))
                }
            };
            let _ = event_tx.send(EngineEvent::PassCompleted { items, result });
        });
    }

    /// Asks the running pass to stop before its next song.
    pub fn cancel(&self) {
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
    }

    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        self.event_rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}
