use songsync_core::{Effect, Msg};
use songsync_engine::{EngineEvent, EngineHandle, ImportEvent, ImportPipeline};
use songsync_logging::{sync_info, sync_warn};

/// Executes core effects against the engine and turns engine events back
/// into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(pipeline: ImportPipeline) -> Self {
        Self {
            engine: EngineHandle::new(pipeline),
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RunImport {
                    target,
                    items,
                    mode,
                } => {
                    sync_info!(
                        "RunImport target={} songs={} mode={:?}",
                        target,
                        items.len(),
                        mode
                    );
                    self.engine.start(target, items, mode);
                }
                Effect::CancelImport => {
                    sync_info!("CancelImport");
                    self.engine.cancel();
                }
            }
        }
    }

    /// Waits for the next engine event, mapped to a message.
    pub async fn next_msg(&mut self) -> Option<Msg> {
        self.engine.next_event().await.map(map_event)
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(ImportEvent::Item(progress)) => Msg::ItemProgress(progress),
        EngineEvent::Progress(ImportEvent::Status(line)) => Msg::StatusChanged(line),
        // The summary arrives again with the completed batch.
        EngineEvent::Progress(ImportEvent::Finished(_)) => Msg::NoOp,
        EngineEvent::PassCompleted { items, result } => match result {
            Ok(summary) => Msg::ImportFinished { items, summary },
            Err(err) => {
                sync_warn!("Import pass rejected: {}", err);
                Msg::ImportRejected(err.to_string())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songsync_core::{ImportState, ItemProgress, ItemStore, PassSummary};
    use songsync_engine::ImportError;

    #[test]
    fn item_progress_maps_to_message() {
        let progress = ItemProgress {
            item_id: "1 A - One".to_string(),
            state: ImportState::Searching,
            message: "Searching for: A - One...".to_string(),
        };
        let msg = map_event(EngineEvent::Progress(ImportEvent::Item(progress.clone())));
        assert_eq!(msg, Msg::ItemProgress(progress));
    }

    #[test]
    fn completed_pass_carries_items_and_summary() {
        let items = ItemStore::collect(["1 A - One"]);
        let summary = PassSummary {
            skipped: 1,
            ..PassSummary::default()
        };
        let msg = map_event(EngineEvent::PassCompleted {
            items: items.clone(),
            result: Ok(summary),
        });
        assert_eq!(msg, Msg::ImportFinished { items, summary });
    }

    #[test]
    fn rejected_pass_reports_reason() {
        let msg = map_event(EngineEvent::PassCompleted {
            items: ItemStore::new(),
            result: Err(ImportError::NotAuthenticated),
        });
        assert_eq!(
            msg,
            Msg::ImportRejected("not signed in to the catalog service".to_string())
        );
    }
}
