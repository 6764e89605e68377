//! Songsync core: import item model, batch store and the pure session state machine.
mod effect;
mod item;
mod msg;
mod normalize;
mod progress;
mod state;
mod store;
mod update;
mod view_model;

pub use effect::{Effect, PassMode};
pub use item::{CollectionId, ImportItem, ImportState, ImportStatus, ItemId, RemoteId};
pub use msg::Msg;
pub use normalize::normalize_folder_name;
pub use progress::{ItemProgress, PassSummary};
pub use state::{AppState, SessionState};
pub use store::{ItemStore, StatusCounts, StoreError};
pub use update::update;
pub use view_model::{AppViewModel, ItemRowView};
