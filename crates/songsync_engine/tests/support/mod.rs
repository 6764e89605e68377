#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use songsync_engine::{
    CatalogClient, CatalogError, Collection, ImportEvent, ProgressSink, SearchHit, UserProfile,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(songsync_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search(String),
    Append {
        collection_id: String,
        remote_id: String,
    },
}

/// Scripted catalog: search answers are keyed by the full query string and
/// append failures by remote id. Unknown queries return no hit.
#[derive(Default)]
pub struct FakeCatalog {
    authenticated: bool,
    hits: Mutex<HashMap<String, Result<Option<SearchHit>, CatalogError>>>,
    append_errors: Mutex<HashMap<String, CatalogError>>,
    calls: Mutex<Vec<(Call, Instant)>>,
    cancel_after_append: Mutex<Option<CancellationToken>>,
    panic_on_search: bool,
}

impl FakeCatalog {
    pub fn signed_in() -> Self {
        Self {
            authenticated: true,
            ..Self::default()
        }
    }

    /// Signed in, but every search panics.
    pub fn panicking() -> Self {
        Self {
            panic_on_search: true,
            ..Self::signed_in()
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn with_hit(self, query: &str, remote_id: &str) -> Self {
        self.set_search(query, Ok(Some(hit(remote_id))));
        self
    }

    pub fn with_search_error(self, query: &str, err: CatalogError) -> Self {
        self.set_search(query, Err(err));
        self
    }

    pub fn with_append_error(self, remote_id: &str, err: CatalogError) -> Self {
        self.append_errors
            .lock()
            .unwrap()
            .insert(remote_id.to_string(), err);
        self
    }

    pub fn set_search(&self, query: &str, result: Result<Option<SearchHit>, CatalogError>) {
        self.hits.lock().unwrap().insert(query.to_string(), result);
    }

    /// Cancels `token` right after the first append call returns.
    pub fn cancel_after_first_append(&self, token: CancellationToken) {
        *self.cancel_after_append.lock().unwrap() = Some(token);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(call, _)| call.clone())
            .collect()
    }

    pub fn timed_calls(&self) -> Vec<(Call, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((call, Instant::now()));
    }
}

pub fn hit(remote_id: &str) -> SearchHit {
    SearchHit {
        id: remote_id.to_string(),
        title: format!("video {remote_id}"),
        channel_title: Some("channel".to_string()),
        thumbnail_url: None,
    }
}

#[async_trait::async_trait]
impl CatalogClient for FakeCatalog {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn current_user(&self) -> Option<UserProfile> {
        self.authenticated.then(UserProfile::default)
    }

    async fn search(&self, query: &str) -> Result<Option<SearchHit>, CatalogError> {
        self.record(Call::Search(query.to_string()));
        if self.panic_on_search {
            panic!("scripted search panic for {query}");
        }
        self.hits
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or(Ok(None))
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, CatalogError> {
        Ok(Vec::new())
    }

    async fn create_collection(&self, title: &str) -> Result<Collection, CatalogError> {
        Ok(Collection {
            id: format!("PL-{title}"),
            title: title.to_string(),
            item_count: Some(0),
        })
    }

    async fn append_to_collection(
        &self,
        collection_id: &str,
        remote_id: &str,
    ) -> Result<(), CatalogError> {
        self.record(Call::Append {
            collection_id: collection_id.to_string(),
            remote_id: remote_id.to_string(),
        });
        if let Some(token) = self.cancel_after_append.lock().unwrap().take() {
            token.cancel();
        }
        match self.append_errors.lock().unwrap().get(remote_id) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<ImportEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<ImportEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: ImportEvent) {
        self.events.lock().unwrap().push(event);
    }
}
