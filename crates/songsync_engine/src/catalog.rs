use std::time::Duration;

use crate::{CatalogError, Collection, SearchHit, UserProfile};

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub api_base: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Search results are restricted to this video category ("10" is Music).
    pub music_category_id: String,
    pub page_size: u32,
    pub playlist_privacy: String,
    pub playlist_description: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            music_category_id: "10".to_string(),
            page_size: 50,
            playlist_privacy: "private".to_string(),
            playlist_description: "Created by songsync".to_string(),
        }
    }
}

/// Remote catalog the pipeline resolves songs against and appends them to.
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    fn is_authenticated(&self) -> bool;

    fn current_user(&self) -> Option<UserProfile>;

    /// Returns the single best-ranked hit, if any.
    async fn search(&self, query: &str) -> Result<Option<SearchHit>, CatalogError>;

    async fn list_collections(&self) -> Result<Vec<Collection>, CatalogError>;

    async fn create_collection(&self, title: &str) -> Result<Collection, CatalogError>;

    async fn append_to_collection(
        &self,
        collection_id: &str,
        remote_id: &str,
    ) -> Result<(), CatalogError>;
}
