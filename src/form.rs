//! Operator input and its validation.
//!
//! Forms hold raw text exactly as typed. Validation turns them into wire
//! bodies or fails with the message shown to the operator; it never touches
//! the network.

use std::str::FromStr;

use stockdesk_core::{Product, ProductBody, ProductId};

use crate::error::{Error, Result};

pub const MISSING_PRODUCT_ID: &str = "Please enter a product ID";
pub const MISSING_FIELDS: &str = "Please fill out all fields";

/// Validate the search box contents.
pub fn product_id(input: &str) -> Result<ProductId> {
    let id = input.trim();
    if id.is_empty() {
        return Err(Error::Validation(MISSING_PRODUCT_ID.to_string()));
    }
    Ok(ProductId::new(id))
}

/// The "add product" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub quantity: String,
    pub condition: String,
    pub restock_level: String,
}

impl ProductForm {
    pub fn validate(&self) -> Result<ProductBody> {
        let fields = [&self.name, &self.quantity, &self.condition, &self.restock_level];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::Validation(MISSING_FIELDS.to_string()));
        }

        Ok(ProductBody {
            name: self.name.trim().to_string(),
            quantity: parse_count(&self.quantity, "Quantity")?,
            condition: self.condition.trim().to_string(),
            restock_level: parse_count(&self.restock_level, "Restock level")?,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Fields the update form lets an operator change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateField {
    Quantity,
    Condition,
    RestockLevel,
}

impl FromStr for UpdateField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quantity" | "qty" => Ok(UpdateField::Quantity),
            "condition" => Ok(UpdateField::Condition),
            "restock" | "restock_level" | "restock-level" => Ok(UpdateField::RestockLevel),
            other => Err(format!(
                "Unknown field '{}' (expected quantity, condition or restock)",
                other
            )),
        }
    }
}

/// The "update product" form. The name is not editable here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateForm {
    pub quantity: String,
    pub condition: String,
    pub restock_level: String,
}

impl UpdateForm {
    /// Pre-fill from the product currently on display.
    pub fn prefill(product: &Product) -> Self {
        Self {
            quantity: product.quantity.to_string(),
            condition: product.condition.clone(),
            restock_level: product.restock_level.to_string(),
        }
    }

    pub fn set(&mut self, field: UpdateField, value: impl Into<String>) {
        let value = value.into();
        match field {
            UpdateField::Quantity => self.quantity = value,
            UpdateField::Condition => self.condition = value,
            UpdateField::RestockLevel => self.restock_level = value,
        }
    }

    /// Build the update body, carrying `name` through unchanged.
    pub fn validate(&self, name: &str) -> Result<ProductBody> {
        let fields = [&self.quantity, &self.condition, &self.restock_level];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::Validation(MISSING_FIELDS.to_string()));
        }

        Ok(ProductBody {
            name: name.to_string(),
            quantity: parse_count(&self.quantity, "Quantity")?,
            condition: self.condition.trim().to_string(),
            restock_level: parse_count(&self.restock_level, "Restock level")?,
        })
    }
}

fn parse_count(value: &str, label: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("{} must be a whole number", label)))
}
