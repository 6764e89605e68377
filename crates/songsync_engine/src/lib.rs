//! Songsync engine: catalog IO, pacing and the import pipeline.
mod auth;
mod catalog;
mod engine;
mod pipeline;
mod progress;
mod rate_limit;
mod scan;
mod types;
mod youtube;

pub use auth::{AuthChange, AuthSession, SubscriptionId, UserProfile};
pub use catalog::{CatalogClient, CatalogSettings};
pub use engine::{EngineEvent, EngineHandle};
pub use pipeline::{
    ImportError, ImportPipeline, PipelineSettings, ALL_PROCESSED_MESSAGE, CANCELLED_MESSAGE,
    NO_MATCH_REASON,
};
pub use progress::{ChannelProgressSink, ImportEvent, ProgressSink};
pub use rate_limit::{RateLimitSettings, RateLimited, RateLimiter};
pub use scan::{scan_song_folders, ScanError};
pub use types::{CatalogError, Collection, FailureKind, SearchHit, GENERIC_FAILURE_REASON};
pub use youtube::YouTubeCatalog;
