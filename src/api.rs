use async_trait::async_trait;
use reqwest::{Method, Url};

use stockdesk_core::{Product, ProductBody, ProductId};

use crate::error::{Error, Result};

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

/// Inventory service trait for transport backends
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Fetch a single product
    async fn get(&self, id: &ProductId) -> Result<Product>;

    /// List products, optionally filtered by condition
    async fn list(&self, condition: Option<&str>) -> Result<Vec<Product>>;

    /// Create a product; the service assigns its id
    async fn create(&self, body: &ProductBody) -> Result<Product>;

    /// Replace a product's fields
    async fn update(&self, id: &ProductId, body: &ProductBody) -> Result<Product>;

    /// Flag a product as damaged
    async fn mark_damaged(&self, id: &ProductId) -> Result<Product>;
}

/// One outbound call against the inventory service.
///
/// Building a request never touches the network, so the request side of the
/// contract can be checked in isolation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub condition: Option<String>,
    pub body: Option<ProductBody>,
}

const COLLECTION: &str = "inventory";

impl ApiRequest {
    /// `GET /inventory/{id}`
    pub fn get(id: &ProductId) -> Self {
        Self::new(Method::GET, vec![COLLECTION.to_string(), id.to_string()])
    }

    /// `GET /inventory`, or `GET /inventory?condition={c}` for a non-blank filter
    pub fn list(condition: Option<&str>) -> Self {
        let mut request = Self::new(Method::GET, vec![COLLECTION.to_string()]);
        request.condition = condition
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);
        request
    }

    /// `POST /inventory`
    pub fn create(body: ProductBody) -> Self {
        let mut request = Self::new(Method::POST, vec![COLLECTION.to_string()]);
        request.body = Some(body);
        request
    }

    /// `PUT /inventory/{id}`
    pub fn update(id: &ProductId, body: ProductBody) -> Self {
        let mut request = Self::new(Method::PUT, vec![COLLECTION.to_string(), id.to_string()]);
        request.body = Some(body);
        request
    }

    /// `PUT /inventory/{id}/mark_damaged` with no body
    pub fn mark_damaged(id: &ProductId) -> Self {
        Self::new(
            Method::PUT,
            vec![
                COLLECTION.to_string(),
                id.to_string(),
                "mark_damaged".to_string(),
            ],
        )
    }

    fn new(method: Method, segments: Vec<String>) -> Self {
        Self {
            method,
            segments,
            condition: None,
            body: None,
        }
    }

    /// Human-readable path, used in logs and errors.
    pub fn path(&self) -> String {
        let mut path = format!("/{}", self.segments.join("/"));
        if let Some(condition) = &self.condition {
            path.push_str("?condition=");
            path.push_str(condition);
        }
        path
    }

    /// Resolve against the service base URL.
    ///
    /// Each segment is percent-encoded on its own, so an id can never escape
    /// its path segment. Any path on `base` is kept as a prefix.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::InvalidUrl(base.to_string()))?;
            segments.pop_if_empty();
            for segment in &self.segments {
                segments.push(segment);
            }
        }

        url.set_query(None);
        url.set_fragment(None);
        if let Some(condition) = &self.condition {
            url.query_pairs_mut().append_pair("condition", condition);
        }

        Ok(url)
    }
}
