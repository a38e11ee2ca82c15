use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use stockdesk_core::{Product, ProductBody, ProductId};

use crate::api::{ApiRequest, InventoryApi};
use crate::config::Config;
use crate::error::{Error, Result};

/// `reqwest`-backed inventory service client
///
/// Every call is a single request. Non-2xx statuses become
/// [`Error::Status`] and their bodies are never parsed.
pub struct HttpInventory {
    client: Client,
    base: Url,
}

impl HttpInventory {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Self::with_client(builder.build()?, &config.base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let url = request.url(&self.base)?;
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("{} {} returned {}", request.method, request.path(), status);
            let path = request.path();
            return Err(Error::Status {
                method: request.method,
                path,
                status,
            });
        }

        let bytes = response.bytes().await?;
        debug!("{} {} -> {} ({} bytes)", request.method, request.path(), status, bytes.len());
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl InventoryApi for HttpInventory {
    async fn get(&self, id: &ProductId) -> Result<Product> {
        self.send(ApiRequest::get(id)).await
    }

    async fn list(&self, condition: Option<&str>) -> Result<Vec<Product>> {
        self.send(ApiRequest::list(condition)).await
    }

    async fn create(&self, body: &ProductBody) -> Result<Product> {
        self.send(ApiRequest::create(body.clone())).await
    }

    async fn update(&self, id: &ProductId, body: &ProductBody) -> Result<Product> {
        self.send(ApiRequest::update(id, body.clone())).await
    }

    async fn mark_damaged(&self, id: &ProductId) -> Result<Product> {
        self.send(ApiRequest::mark_damaged(id)).await
    }
}
