//! Scripted in-memory [`InventoryApi`] for unit tests.
//!
//! Responses are queued up front and consumed in order; every call is
//! recorded as the [`ApiRequest`] the HTTP backend would have sent. A
//! [`Gate`] keeps calls open until the test releases them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::Notify;

use stockdesk_core::{Product, ProductBody, ProductId};

use crate::api::{ApiRequest, InventoryApi};
use crate::error::{Error, Result};

#[derive(Default)]
pub struct MockInventory {
    replies: Mutex<VecDeque<std::result::Result<serde_json::Value, StatusCode>>>,
    requests: Mutex<Vec<ApiRequest>>,
    gate: Mutex<Option<Arc<Gate>>>,
}

/// Parks each call after it is recorded until [`Gate::release`].
#[derive(Default)]
pub struct Gate {
    entered: Notify,
    released: Notify,
}

impl Gate {
    /// Wait until a call is parked on this gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }
}

impl MockInventory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply_ok(&self, value: serde_json::Value) -> &Self {
        self.replies.lock().unwrap().push_back(Ok(value));
        self
    }

    pub fn reply_status(&self, status: StatusCode) -> &Self {
        self.replies.lock().unwrap().push_back(Err(status));
        self
    }

    /// Hold every following call open until the returned gate is released.
    pub fn hold(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    async fn respond<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.requests.lock().unwrap().push(request.clone());
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.released.notified().await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {} {}", request.method, request.path()));

        match reply {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(status) => Err(Error::Status {
                method: request.method.clone(),
                path: request.path(),
                status,
            }),
        }
    }
}

#[async_trait]
impl InventoryApi for MockInventory {
    async fn get(&self, id: &ProductId) -> Result<Product> {
        self.respond(ApiRequest::get(id)).await
    }

    async fn list(&self, condition: Option<&str>) -> Result<Vec<Product>> {
        self.respond(ApiRequest::list(condition)).await
    }

    async fn create(&self, body: &ProductBody) -> Result<Product> {
        self.respond(ApiRequest::create(body.clone())).await
    }

    async fn update(&self, id: &ProductId, body: &ProductBody) -> Result<Product> {
        self.respond(ApiRequest::update(id, body.clone())).await
    }

    async fn mark_damaged(&self, id: &ProductId) -> Result<Product> {
        self.respond(ApiRequest::mark_damaged(id)).await
    }
}

/// JSON for a product as the service would return it.
pub fn product_json(id: u64, name: &str, quantity: u32, condition: &str, restock_level: u32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "quantity": quantity,
        "condition": condition,
        "restock_level": restock_level,
    })
}
