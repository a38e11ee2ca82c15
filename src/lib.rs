//! Admin client for the inventory REST service.
//!
//! An [`AdminSession`] lets an operator search for a product by id, list and
//! filter products by condition, add products, update a product's quantity,
//! condition and restock level, and mark a product as damaged. The session
//! owns the selected product and a [`View`](view::View) of what the operator
//! sees; the transport sits behind the [`InventoryApi`] trait.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use stockdesk::{AdminSession, HttpInventory};
//!
//! let api = Arc::new(HttpInventory::new("http://localhost:8080")?);
//! let mut session = AdminSession::new(api, Duration::from_secs(5));
//!
//! session.search_product("42").await?;
//! session.edit_product()?;
//! session.update_product().await?;
//! ```

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod render;
pub mod shell;
pub mod view;

pub use admin::AdminSession;
pub use api::http::HttpInventory;
pub use api::{ApiRequest, InventoryApi};
pub use config::Config;
pub use error::{Error, Result};
pub use stockdesk_core::{condition, Product, ProductBody, ProductId, StockStatus};
