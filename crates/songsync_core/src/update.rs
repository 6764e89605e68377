use crate::state::IDLE_STATUS;
use crate::{AppState, Effect, ItemStore, Msg, PassMode, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FoldersScanned(names) => {
            if state.session() != SessionState::Idle {
                return (state, Vec::new());
            }
            state.replace_items(ItemStore::collect(names));
            state.set_status_line(IDLE_STATUS);
            state.clear_error();
            Vec::new()
        }
        Msg::CollectionSelected(target) => {
            if state.session() == SessionState::Idle {
                state.set_target(target);
            }
            Vec::new()
        }
        Msg::ImportRequested => start_import(&mut state, PassMode::Normal),
        Msg::RetryFailedRequested => start_import(&mut state, PassMode::RetryFailed),
        Msg::CancelRequested => {
            if state.session() == SessionState::Running {
                state.set_session(SessionState::Cancelling);
                state.set_status_line("Cancelling after the current song...");
                vec![Effect::CancelImport]
            } else {
                Vec::new()
            }
        }
        Msg::ItemProgress(progress) => {
            if let Err(err) = state.items_mut().update(&progress.item_id, progress.state) {
                state.set_error(err.to_string());
            }
            state.set_status_line(progress.message);
            Vec::new()
        }
        Msg::StatusChanged(line) => {
            state.set_status_line(line);
            Vec::new()
        }
        Msg::ImportFinished { items, summary } => {
            state.take_stashed_items();
            state.replace_items(items);
            state.set_summary(summary);
            state.set_session(SessionState::Idle);
            Vec::new()
        }
        Msg::ImportRejected(reason) => {
            if let Some(items) = state.take_stashed_items() {
                state.replace_items(items);
            }
            state.set_session(SessionState::Idle);
            state.set_error(reason);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_import(state: &mut AppState, mode: PassMode) -> Vec<Effect> {
    if state.session() != SessionState::Idle {
        state.set_error("An import is already running.");
        return Vec::new();
    }
    let Some(target) = state.target().map(ToOwned::to_owned) else {
        state.set_error("Select a playlist first.");
        return Vec::new();
    };
    if state.items().is_empty() {
        state.set_error("No song folders loaded.");
        return Vec::new();
    }

    let counts = state.items().counts();
    let blocked = match mode {
        PassMode::Normal if counts.pending > 0 => None,
        PassMode::Normal if counts.failed > 0 => {
            Some("No pending songs left. Retry the failed ones instead.")
        }
        PassMode::Normal => Some("Every song is already in the playlist."),
        PassMode::RetryFailed if counts.failed > 0 => None,
        PassMode::RetryFailed => Some("There are no failed songs to retry."),
    };
    if let Some(reason) = blocked {
        state.set_error(reason);
        return Vec::new();
    }

    if mode == PassMode::RetryFailed {
        state.stash_items();
        state.items_mut().reset_failed();
    }
    state.clear_error();
    state.set_session(SessionState::Running);
    vec![Effect::RunImport {
        target,
        items: state.items().clone(),
        mode,
    }]
}
