//! Tree Backend Transport
//!
//! The child-fetch contract consumed by [`crate::store::NodeChildStore`], the
//! keyset paging and mutation endpoints used around it, and an HTTP client
//! implementing both against the tree backend's JSON API.

use crate::error::{FieldMessage, TransportError, ValidationError};
use crate::types::{InsertPosition, Node, NodeId, NodeIn, Page, PageRequest, ParentId};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Child-fetch contract.
///
/// Must be safe to call once per distinct parent per loading cycle; callers
/// coalesce, implementations do not need to.
#[async_trait]
pub trait ChildFetcher: Send + Sync {
    /// Fetch the ordered children of `parent`
    async fn fetch_children(&self, parent: ParentId) -> Result<Vec<Node>, TransportError>;
}

/// Flat listing and mutation endpoints of the backend.
///
/// Mutations invalidate cached child lists; which entries to drop is up to
/// the caller (see [`crate::state::TreeState::invalidate`]).
#[async_trait]
pub trait TreeBackend: ChildFetcher {
    /// Fetch one keyset page of the pre-order flattened tree
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, TransportError>;

    /// Total node count (eventually consistent with inserts)
    async fn count(&self) -> Result<u64, TransportError>;

    /// Insert a subtree at the given position
    async fn insert_tree(&self, tree: &NodeIn, position: InsertPosition)
        -> Result<(), TransportError>;

    /// Delete a node and its subtree
    async fn delete_node(&self, id: NodeId) -> Result<(), TransportError>;

    /// Move a node (with its subtree) before another node, or to the end
    async fn move_node(&self, id: NodeId, before: Option<NodeId>) -> Result<(), TransportError>;
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Backend base URL, without the `/api` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Page size for the flat listing
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    100
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

impl TransportConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "base_url must start with http:// or https:// (got '{}')",
                self.base_url
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.page_size == 0 {
            return Err("page_size must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ValidationBody {
    #[serde(default)]
    detail: Vec<FieldMessage>,
}

fn map_http_error(error: reqwest::Error) -> TransportError {
    if let Some(status) = error.status() {
        TransportError::Status {
            status: status.as_u16(),
            message: error.to_string(),
        }
    } else if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else if error.is_decode() {
        TransportError::Decode(error.to_string())
    } else {
        TransportError::Http(error.to_string())
    }
}

/// Turn a non-success status plus body into a transport error. `422` bodies
/// carry field-level messages.
pub(crate) fn error_from_body(status: StatusCode, body: &str) -> TransportError {
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Ok(parsed) = serde_json::from_str::<ValidationBody>(body) {
            return TransportError::Validation(ValidationError::new(parsed.detail));
        }
    }
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.to_string()
    };
    TransportError::Status {
        status: status.as_u16(),
        message,
    }
}

async fn check_status(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(error_from_body(status, &body))
}

/// HTTP client for the tree backend's JSON API
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TransportError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn children_url(&self, parent: ParentId) -> String {
        format!("{}/api/children/{}", self.base_url, parent)
    }

    fn tree_url(&self) -> String {
        format!("{}/api/tree", self.base_url)
    }

    fn node_url(&self, id: NodeId) -> String {
        format!("{}/api/node/{}", self.base_url, id)
    }

    fn insert_request(&self, tree: &NodeIn, position: InsertPosition) -> RequestBuilder {
        let request = self.client.post(self.tree_url()).json(tree);
        match position.query_value() {
            Some(before) => request.query(&[("insert_before", before)]),
            None => request,
        }
    }

    fn delete_request(&self, id: NodeId) -> RequestBuilder {
        self.client.delete(self.node_url(id))
    }

    fn move_request(&self, id: NodeId, before: Option<NodeId>) -> RequestBuilder {
        let request = self.client.put(self.node_url(id));
        match before {
            Some(before) => request.query(&[("move_before", before.to_string())]),
            None => request,
        }
    }
}

/// The count endpoint answers with a bare JSON number
fn decode_count(body: &str) -> Result<u64, TransportError> {
    serde_json::from_str(body.trim())
        .map_err(|e| TransportError::Decode(format!("tree count: {}", e)))
}

#[async_trait]
impl ChildFetcher for HttpTransport {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_children(&self, parent: ParentId) -> Result<Vec<Node>, TransportError> {
        let response = self
            .client
            .get(self.children_url(parent))
            .send()
            .await
            .map_err(map_http_error)?;
        let response = check_status(response).await?;

        let nodes: Vec<Node> = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(format!("children of {}: {}", parent, e)))?;
        debug!(parent = %parent, count = nodes.len(), "Fetched child list");
        Ok(nodes)
    }
}

#[async_trait]
impl TreeBackend for HttpTransport {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, TransportError> {
        request.validate()?;

        let response = self
            .client
            .get(self.tree_url())
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(map_http_error)?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| TransportError::Decode(format!("tree page: {}", e)))
    }

    async fn count(&self) -> Result<u64, TransportError> {
        let response = self
            .client
            .get(format!("{}/count", self.tree_url()))
            .send()
            .await
            .map_err(map_http_error)?;
        let response = check_status(response).await?;

        let body = response.text().await.map_err(map_http_error)?;
        decode_count(&body)
    }

    async fn insert_tree(
        &self,
        tree: &NodeIn,
        position: InsertPosition,
    ) -> Result<(), TransportError> {
        let response = self
            .insert_request(tree, position)
            .send()
            .await
            .map_err(map_http_error)?;
        check_status(response).await?;
        debug!(nodes = tree.node_count(), ?position, "Inserted subtree");
        Ok(())
    }

    async fn delete_node(&self, id: NodeId) -> Result<(), TransportError> {
        let response = self
            .delete_request(id)
            .send()
            .await
            .map_err(map_http_error)?;
        check_status(response).await?;
        Ok(())
    }

    async fn move_node(&self, id: NodeId, before: Option<NodeId>) -> Result<(), TransportError> {
        let response = self
            .move_request(id, before)
            .send()
            .await
            .map_err(map_http_error)?;
        check_status(response).await?;
        debug!(node = %id, ?before, "Moved node");
        Ok(())
    }
}
