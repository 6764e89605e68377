use songsync_core::{ItemProgress, PassSummary};
use tokio::sync::mpsc::UnboundedSender;

use crate::EngineEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent {
    /// An item changed state.
    Item(ItemProgress),
    /// Batch-level status line.
    Status(String),
    /// The pass ended, completed or cancelled.
    Finished(PassSummary),
}

/// Fire-and-forget receiver of pipeline progress.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ImportEvent);
}

pub struct ChannelProgressSink {
    tx: UnboundedSender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: ImportEvent) {
        let _ = self.tx.send(EngineEvent::Progress(event));
    }
}
