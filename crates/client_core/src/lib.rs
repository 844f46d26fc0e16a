use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde_json::Value;
use shared::{
    error::ErrorBody,
    protocol::{CollectionInfo, DocumentHeader, NewEntityBody},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

/// Outcome of any store operation: success with a payload, or exactly one
/// failure value. No retries, no differentiation beyond what the server said.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid store base url {url:?}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: Option<url::ParseError>,
    },
    #[error("request transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store rejected request with status {status}")]
    Api { status: u16, body: Option<ErrorBody> },
}

impl RequestError {
    /// HTTP status of the rejection, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-side error number from the structured failure payload.
    pub fn error_num(&self) -> Option<i64> {
        match self {
            Self::Api {
                body: Some(body), ..
            } => Some(body.error_num),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKind {
    Document,
    Edge,
}

impl EntityKind {
    fn segment(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Edge => "edge",
        }
    }
}

/// Seam for UI layers and tools: every operation of the admin client,
/// without pinning callers to the HTTP implementation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(
        &self,
        collection: &str,
        key: Option<&str>,
    ) -> Result<DocumentHeader, RequestError>;
    async fn create_edge(
        &self,
        collection: &str,
        from: &str,
        to: &str,
        key: Option<&str>,
    ) -> Result<Value, RequestError>;
    async fn fetch_document(&self, collection: &str, key: &str) -> Result<Value, RequestError>;
    async fn fetch_edge(&self, collection: &str, key: &str) -> Result<Value, RequestError>;
    async fn save_document(
        &self,
        collection: &str,
        key: &str,
        payload: &Value,
    ) -> Result<(), RequestError>;
    async fn save_edge(
        &self,
        collection: &str,
        key: &str,
        payload: &Value,
    ) -> Result<(), RequestError>;
    async fn delete_document(&self, collection: &str, key: &str) -> Result<(), RequestError>;
    async fn delete_edge(&self, collection: &str, key: &str) -> Result<(), RequestError>;
    async fn fetch_collection_info(&self, identifier: &str)
        -> Result<CollectionInfo, RequestError>;
}

/// View-model state mirrored from the store: at most the last successfully
/// fetched entity, plus the last collection descriptor.
struct LocalState {
    documents: Vec<Value>,
    collection_info: Option<CollectionInfo>,
}

/// Admin client for a document/edge store. Translates UI intents into HTTP
/// calls against `/_api/document`, `/_api/edge` and `/_api/collection`, and
/// mirrors the last-fetched entity for rendering.
///
/// All operations are awaited to completion, so a caller always holds a
/// definitive outcome before proceeding. Mutation of the local mirror is
/// serialized per client instance.
pub struct DocumentStoreClient {
    http: Client,
    base_url: Url,
    inner: Mutex<LocalState>,
}

impl DocumentStoreClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, RequestError> {
        let raw = base_url.as_ref();
        let url = Url::parse(raw).map_err(|source| RequestError::InvalidBaseUrl {
            url: raw.to_string(),
            source: Some(source),
        })?;
        if url.cannot_be_a_base() {
            return Err(RequestError::InvalidBaseUrl {
                url: raw.to_string(),
                source: None,
            });
        }
        Ok(Self {
            http: Client::new(),
            base_url: url,
            inner: Mutex::new(LocalState {
                documents: Vec::new(),
                collection_info: None,
            }),
        })
    }

    /// Builds `{base}/_api/{segments...}`. Segments are percent-encoded, so
    /// collection names and keys never leak into path structure.
    fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.push("_api");
            for segment in segments {
                path.push(segment);
            }
        }
        url.set_query(None);
        url
    }

    pub async fn create_document(
        &self,
        collection: &str,
        key: Option<&str>,
    ) -> Result<DocumentHeader, RequestError> {
        let mut url = self.api_url(&["document"]);
        url.query_pairs_mut().append_pair("collection", collection);
        debug!(%url, "create document");
        let response = self
            .http
            .post(url)
            .json(&NewEntityBody::with_key(key))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn create_edge(
        &self,
        collection: &str,
        from: &str,
        to: &str,
        key: Option<&str>,
    ) -> Result<Value, RequestError> {
        let mut url = self.api_url(&["edge"]);
        url.query_pairs_mut()
            .append_pair("collection", collection)
            .append_pair("from", from)
            .append_pair("to", to);
        debug!(%url, "create edge");
        let response = self
            .http
            .post(url)
            .json(&NewEntityBody::with_key(key))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn fetch_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Value, RequestError> {
        self.fetch_entity(EntityKind::Document, collection, key)
            .await
    }

    pub async fn fetch_edge(&self, collection: &str, key: &str) -> Result<Value, RequestError> {
        self.fetch_entity(EntityKind::Edge, collection, key).await
    }

    /// The mirror is cleared before the request goes out; a failed fetch
    /// therefore leaves it empty, never stale.
    async fn fetch_entity(
        &self,
        kind: EntityKind,
        collection: &str,
        key: &str,
    ) -> Result<Value, RequestError> {
        self.clear_local().await;
        let url = self.api_url(&[kind.segment(), collection, key]);
        debug!(%url, "fetch entity");
        let response = check_status(self.http.get(url).send().await?).await?;
        let entity: Value = response.json().await?;
        let mut inner = self.inner.lock().await;
        inner.documents.clear();
        inner.documents.push(entity.clone());
        Ok(entity)
    }

    pub async fn save_document(
        &self,
        collection: &str,
        key: &str,
        payload: &Value,
    ) -> Result<(), RequestError> {
        self.save_entity(EntityKind::Document, collection, key, payload)
            .await
    }

    pub async fn save_edge(
        &self,
        collection: &str,
        key: &str,
        payload: &Value,
    ) -> Result<(), RequestError> {
        self.save_entity(EntityKind::Edge, collection, key, payload)
            .await
    }

    async fn save_entity(
        &self,
        kind: EntityKind,
        collection: &str,
        key: &str,
        payload: &Value,
    ) -> Result<(), RequestError> {
        let url = self.api_url(&[kind.segment(), collection, key]);
        debug!(%url, "save entity");
        check_status(self.http.put(url).json(payload).send().await?).await?;
        Ok(())
    }

    pub async fn delete_document(&self, collection: &str, key: &str) -> Result<(), RequestError> {
        self.delete_entity(EntityKind::Document, collection, key)
            .await
    }

    pub async fn delete_edge(&self, collection: &str, key: &str) -> Result<(), RequestError> {
        self.delete_entity(EntityKind::Edge, collection, key).await
    }

    async fn delete_entity(
        &self,
        kind: EntityKind,
        collection: &str,
        key: &str,
    ) -> Result<(), RequestError> {
        let url = self.api_url(&[kind.segment(), collection, key]);
        debug!(%url, "delete entity");
        check_status(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    /// Fetches the collection descriptor and stores it in the single
    /// metadata slot, overwriting whatever was there.
    pub async fn fetch_collection_info(
        &self,
        identifier: &str,
    ) -> Result<CollectionInfo, RequestError> {
        let mut url = self.api_url(&["collection", identifier]);
        // Bare random query token, so intermediaries never serve a stale
        // descriptor for the same path.
        url.set_query(Some(&cache_bust_token()));
        debug!(%url, "fetch collection info");
        let response = check_status(self.http.get(url).send().await?).await?;
        let info: CollectionInfo = response.json().await?;
        self.inner.lock().await.collection_info = Some(info.clone());
        Ok(info)
    }

    /// Replaces the local mirror with an externally obtained entity.
    pub async fn replace_local(&self, data: Value) {
        let mut inner = self.inner.lock().await;
        inner.documents.clear();
        inner.documents.push(data);
    }

    pub async fn clear_local(&self) {
        self.inner.lock().await.documents.clear();
    }

    /// Snapshot of the mirrored entities (at most one).
    pub async fn local_documents(&self) -> Vec<Value> {
        self.inner.lock().await.documents.clone()
    }

    /// Snapshot of the cached collection descriptor, if any was fetched.
    pub async fn collection_info(&self) -> Option<CollectionInfo> {
        self.inner.lock().await.collection_info.clone()
    }
}

#[async_trait]
impl DocumentStore for DocumentStoreClient {
    async fn create_document(
        &self,
        collection: &str,
        key: Option<&str>,
    ) -> Result<DocumentHeader, RequestError> {
        DocumentStoreClient::create_document(self, collection, key).await
    }

    async fn create_edge(
        &self,
        collection: &str,
        from: &str,
        to: &str,
        key: Option<&str>,
    ) -> Result<Value, RequestError> {
        DocumentStoreClient::create_edge(self, collection, from, to, key).await
    }

    async fn fetch_document(&self, collection: &str, key: &str) -> Result<Value, RequestError> {
        DocumentStoreClient::fetch_document(self, collection, key).await
    }

    async fn fetch_edge(&self, collection: &str, key: &str) -> Result<Value, RequestError> {
        DocumentStoreClient::fetch_edge(self, collection, key).await
    }

    async fn save_document(
        &self,
        collection: &str,
        key: &str,
        payload: &Value,
    ) -> Result<(), RequestError> {
        DocumentStoreClient::save_document(self, collection, key, payload).await
    }

    async fn save_edge(
        &self,
        collection: &str,
        key: &str,
        payload: &Value,
    ) -> Result<(), RequestError> {
        DocumentStoreClient::save_edge(self, collection, key, payload).await
    }

    async fn delete_document(&self, collection: &str, key: &str) -> Result<(), RequestError> {
        DocumentStoreClient::delete_document(self, collection, key).await
    }

    async fn delete_edge(&self, collection: &str, key: &str) -> Result<(), RequestError> {
        DocumentStoreClient::delete_edge(self, collection, key).await
    }

    async fn fetch_collection_info(
        &self,
        identifier: &str,
    ) -> Result<CollectionInfo, RequestError> {
        DocumentStoreClient::fetch_collection_info(self, identifier).await
    }
}

/// Maps a response onto the two-outcome contract. Non-2xx becomes
/// `RequestError::Api`, carrying the structured error body when the server
/// sent one.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.json::<ErrorBody>().await.ok();
    warn!(status = status.as_u16(), "store rejected request");
    Err(RequestError::Api {
        status: status.as_u16(),
        body,
    })
}

fn cache_bust_token() -> String {
    rand::thread_rng().gen_range(0..10_000_000u32).to_string()
}
