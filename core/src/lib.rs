//! Wire types for the stockdesk inventory admin client.
//!
//! This crate provides the data types exchanged with the inventory REST
//! service, shared by the admin client and anything else that talks to the
//! `/inventory` endpoints.
//!
//! # Overview
//!
//! The main types are:
//!
//! - [`Product`] - An inventory record as returned by the service
//! - [`ProductId`] - The server-assigned product identifier
//! - [`ProductBody`] - The JSON body sent when creating or updating a product
//! - [`StockStatus`] - Whether a product is below its restock level
//!
//! # Example
//!
//! Fetching a product from the inventory service:
//!
//! ```ignore
//! use stockdesk_core::Product;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = reqwest::Client::new();
//!
//! let product: Product = client
//!     .get("http://localhost:8080/inventory/42")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//!
//! println!("{} ({}): {}", product.name, product.id, product.stock_status());
//! # Ok(())
//! # }
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Condition names understood by the inventory service.
///
/// The service stores condition as free text, so any string is accepted on
/// the wire. These are the values the service itself produces.
pub mod condition {
    pub const NEW: &str = "new";
    pub const USED: &str = "used";
    pub const OPEN_BOX: &str = "open_box";
    pub const DAMAGED: &str = "damaged";

    /// All known conditions, in the order they are offered to operators.
    pub const KNOWN: [&str; 4] = [NEW, USED, OPEN_BOX, DAMAGED];
}

/// Server-assigned product identifier.
///
/// The service emits integer ids, but the client treats them as opaque text.
/// Deserialization accepts either a JSON number or a JSON string.
///
/// # Example
///
/// ```
/// use stockdesk_core::ProductId;
///
/// let from_number: ProductId = serde_json::from_str("42").unwrap();
/// let from_string: ProductId = serde_json::from_str("\"42\"").unwrap();
///
/// assert_eq!(from_number, from_string);
/// assert_eq!(from_number.as_str(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// An inventory record.
///
/// Server-owned; the client only ever holds a transient copy for display or
/// editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(deserialize_with = "lenient_count")]
    pub quantity: u32,
    pub condition: String,
    #[serde(deserialize_with = "lenient_count")]
    pub restock_level: u32,
}

impl Product {
    /// Stock status of this product relative to its restock level.
    ///
    /// ```
    /// use stockdesk_core::{Product, ProductId, StockStatus};
    ///
    /// let product = Product {
    ///     id: ProductId::new("1"),
    ///     name: "Widget".to_string(),
    ///     quantity: 3,
    ///     condition: "new".to_string(),
    ///     restock_level: 5,
    /// };
    ///
    /// assert_eq!(product.stock_status(), StockStatus::Low);
    /// ```
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::of(self.quantity, self.restock_level)
    }

    pub fn is_damaged(&self) -> bool {
        self.condition.eq_ignore_ascii_case(condition::DAMAGED)
    }
}

/// Request body for `POST /inventory` and `PUT /inventory/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBody {
    pub name: String,
    pub quantity: u32,
    pub condition: String,
    pub restock_level: u32,
}

impl From<&Product> for ProductBody {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            quantity: product.quantity,
            condition: product.condition.clone(),
            restock_level: product.restock_level,
        }
    }
}

/// Stock level of a product compared to its restock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    /// Quantity is strictly below the restock level.
    Low,
    /// Quantity is at or above the restock level.
    Adequate,
}

impl StockStatus {
    /// ```
    /// use stockdesk_core::StockStatus;
    ///
    /// assert_eq!(StockStatus::of(3, 5), StockStatus::Low);
    /// assert_eq!(StockStatus::of(5, 5), StockStatus::Adequate);
    /// assert_eq!(StockStatus::of(10, 5), StockStatus::Adequate);
    /// ```
    pub fn of(quantity: u32, restock_level: u32) -> Self {
        if quantity < restock_level {
            StockStatus::Low
        } else {
            StockStatus::Adequate
        }
    }

    /// Operator-facing description of the status.
    pub fn message(&self) -> &'static str {
        match self {
            StockStatus::Low => "Low Stock Alert! Quantity is below restock level.",
            StockStatus::Adequate => "Stock level is adequate.",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Accepts a non-negative count as either a JSON number or a numeric string.
///
/// The inventory service has been seen returning `restock_level` both ways.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
