use std::collections::HashSet;
use std::sync::Arc;

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use songsync_logging::{sync_debug, sync_trace, sync_warn};
use url::Url;

use crate::{
    AuthSession, CatalogClient, CatalogError, CatalogSettings, Collection, FailureKind,
    SearchHit, UserProfile,
};

// Resource paths under the API base.
const SEARCH_PATH: &str = "search";
const PLAYLISTS_PATH: &str = "playlists";
const PLAYLIST_ITEMS_PATH: &str = "playlistItems";

/// YouTube Data API v3 catalog.
#[derive(Debug, Clone)]
pub struct YouTubeCatalog {
    settings: CatalogSettings,
    auth: Arc<AuthSession>,
    client: reqwest::Client,
}

impl YouTubeCatalog {
    pub fn new(settings: CatalogSettings, auth: Arc<AuthSession>) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| CatalogError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            auth,
            client,
        })
    }

    pub fn auth(&self) -> &Arc<AuthSession> {
        &self.auth
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, CatalogError> {
        let base = self.settings.api_base.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}"))
            .map_err(|err| CatalogError::new(FailureKind::InvalidRequest, err.to_string()))?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    fn bearer(&self) -> Result<String, CatalogError> {
        self.auth.access_token().ok_or_else(|| {
            CatalogError::new(FailureKind::NotAuthenticated, "Not signed in to YouTube.")
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let token = self.bearer()?;
        sync_debug!("GET {}", url.path());
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        response.json().await.map_err(map_reqwest_error)
    }

    async fn post_json(
        &self,
        url: Url,
        body: &serde_json::Value,
    ) -> Result<Response, CatalogError> {
        let token = self.bearer()?;
        sync_debug!("POST {}", url.path());
        sync_trace!("POST body {}", body);
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response).await
    }
}

#[async_trait::async_trait]
impl CatalogClient for YouTubeCatalog {
    fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    fn current_user(&self) -> Option<UserProfile> {
        self.auth.current_user()
    }

    async fn search(&self, query: &str) -> Result<Option<SearchHit>, CatalogError> {
        let url = self.endpoint(
            SEARCH_PATH,
            &[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "1"),
                ("videoCategoryId", self.settings.music_category_id.as_str()),
                ("q", query),
            ],
        )?;
        let response: SearchResponse = self.get_json(url).await?;
        Ok(response.items.into_iter().find_map(SearchItem::into_hit))
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, CatalogError> {
        let page_size = self.settings.page_size.to_string();
        let mut collections = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        loop {
            let mut query = vec![
                ("part", "snippet,contentDetails"),
                ("mine", "true"),
                ("maxResults", page_size.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let url = self.endpoint(PLAYLISTS_PATH, &query)?;
            let page: PlaylistListResponse = self.get_json(url).await?;
            collections.extend(page.items.into_iter().map(Collection::from));
            match page.next_page_token {
                Some(next) if !next.is_empty() && seen_tokens.insert(next.clone()) => {
                    page_token = Some(next);
                }
                Some(next) if !next.is_empty() => {
                    sync_warn!("Playlist paging repeated token {}, stopping", next);
                    break;
                }
                _ => break,
            }
        }
        sync_debug!("Listed {} playlists", collections.len());
        Ok(collections)
    }

    async fn create_collection(&self, title: &str) -> Result<Collection, CatalogError> {
        let url = self.endpoint(PLAYLISTS_PATH, &[("part", "snippet,status")])?;
        let body = json!({
            "snippet": {
                "title": title,
                "description": self.settings.playlist_description,
            },
            "status": {
                "privacyStatus": self.settings.playlist_privacy,
            },
        });
        let response = self.post_json(url, &body).await?;
        let playlist: PlaylistResource = response.json().await.map_err(map_reqwest_error)?;
        Ok(Collection {
            item_count: Some(0),
            ..Collection::from(playlist)
        })
    }

    async fn append_to_collection(
        &self,
        collection_id: &str,
        remote_id: &str,
    ) -> Result<(), CatalogError> {
        let url = self.endpoint(PLAYLIST_ITEMS_PATH, &[("part", "snippet")])?;
        let body = json!({
            "snippet": {
                "playlistId": collection_id,
                "resourceId": {
                    "kind": "youtube#video",
                    "videoId": remote_id,
                },
            },
        });
        self.post_json(url, &body).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_from_body(status.as_u16(), &body))
}

fn error_from_body(status: u16, body: &str) -> CatalogError {
    let service_message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty());
    match service_message {
        Some(message) => CatalogError::new(FailureKind::Service { status }, message),
        None if status == 401 => {
            CatalogError::new(FailureKind::NotAuthenticated, "http status 401")
        }
        None => CatalogError::new(FailureKind::HttpStatus(status), format!("http status {status}")),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> CatalogError {
    if err.is_timeout() {
        return CatalogError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return CatalogError::new(FailureKind::Decode, err.to_string());
    }
    CatalogError::new(FailureKind::Network, err.to_string())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: SearchSnippet,
}

impl SearchItem {
    fn into_hit(self) -> Option<SearchHit> {
        let id = self.id.video_id.filter(|id| !id.is_empty())?;
        Some(SearchHit {
            id,
            title: self.snippet.title,
            channel_title: self.snippet.channel_title,
            thumbnail_url: self.snippet.thumbnails.default.map(|thumb| thumb.url),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    title: String,
    channel_title: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistListResponse {
    #[serde(default)]
    items: Vec<PlaylistResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistResource {
    id: String,
    snippet: PlaylistSnippet,
    content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Deserialize)]
struct PlaylistSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistContentDetails {
    item_count: Option<u64>,
}

impl From<PlaylistResource> for Collection {
    fn from(playlist: PlaylistResource) -> Self {
        Self {
            id: playlist.id,
            title: playlist.snippet.title,
            item_count: playlist.content_details.and_then(|details| details.item_count),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
