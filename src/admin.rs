//! The admin session: operator actions against the inventory service.
//!
//! Every network operation follows the same shape: validate locally, mark its
//! control busy, send exactly one request, restore the control, then reflect
//! the outcome in the [`View`]. Local failures never reach the transport.
//!
//! Control state is also published on a [`watch`] channel each time it
//! changes, so a renderer running elsewhere can show a busy control while the
//! session itself is parked on its request.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, warn};

use stockdesk_core::{Product, ProductId};

use crate::api::InventoryApi;
use crate::error::{Error, Result};
use crate::form::{self, UpdateForm};
use crate::view::{Controls, MessageKind, Slot, View};

pub const NO_SELECTION: &str = "No product selected";
pub const SEARCH_FIRST: &str = "Please search for a product first";

/// One operator's controller state.
///
/// Operations take `&mut self`, so two of them can never be in flight on the
/// same session at once.
pub struct AdminSession {
    api: Arc<dyn InventoryApi>,
    view: View,
    selected: Option<ProductId>,
    controls_tx: watch::Sender<Controls>,
}

impl AdminSession {
    pub fn new(api: Arc<dyn InventoryApi>, message_ttl: Duration) -> Self {
        let view = View::new(message_ttl);
        let (controls_tx, _) = watch::channel(view.controls.clone());
        Self {
            api,
            view,
            selected: None,
            controls_tx,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Identifier that update and mark-damaged act on.
    pub fn selected(&self) -> Option<&ProductId> {
        self.selected.as_ref()
    }

    /// Follow control labels and enabled state as operations run.
    pub fn watch_controls(&self) -> watch::Receiver<Controls> {
        self.controls_tx.subscribe()
    }

    /// Drop inline messages whose display interval has elapsed.
    pub fn dismiss_expired(&mut self) {
        self.view.dismiss_expired(Instant::now());
    }

    /// Look up a product and put it in the details panel.
    pub async fn search_product(&mut self, input: &str) -> Result<Product> {
        let id = self.requested_id(input)?;
        self.view.clear_message(Slot::Search);

        self.view.controls.search.begin();
        self.publish_controls();
        let result = self.api.get(&id).await;
        self.view.controls.search.finish();
        self.publish_controls();

        match result {
            Ok(product) => {
                self.select(product.clone());
                Ok(product)
            }
            Err(e) => {
                let text = match &e {
                    Error::Status { .. } => format!("Product with ID {} not found", id),
                    Error::Json(_) => format!("Unexpected response for product {}", id),
                    Error::Transport(_) => {
                        format!("Could not reach the inventory service while looking up {}", id)
                    }
                    other => format!("Could not look up product {}: {}", id, other),
                };
                warn!("search for {} failed: {}", id, e);
                self.selected = None;
                self.view.hide_details();
                self.view.show_message(Slot::Search, MessageKind::Error, text, Instant::now());
                Err(e)
            }
        }
    }

    /// Select a row of the product table, as a successful search would.
    ///
    /// The row already holds what the list call returned, so nothing is sent.
    pub fn select_row(&mut self, input: &str) -> Result<Product> {
        let id = self.requested_id(input)?;
        let Some(product) = self.view.rows().iter().find(|p| p.id == id).cloned() else {
            let text = format!("Product with ID {} is not in the product list", id);
            self.view
                .show_message(Slot::Search, MessageKind::Error, text.clone(), Instant::now());
            return Err(Error::NoSelection(text));
        };

        self.view.clear_message(Slot::Search);
        self.select(product.clone());
        Ok(product)
    }

    /// Fill the product table, optionally filtered by condition.
    pub async fn list_products(&mut self, condition: Option<&str>) -> Result<Vec<Product>> {
        let condition = condition.map(str::trim).filter(|c| !c.is_empty());

        self.view.controls.list.begin();
        self.publish_controls();
        let result = self.api.list(condition).await;
        self.view.controls.list.finish();
        self.publish_controls();

        match result {
            Ok(products) => {
                self.view.set_rows(products.clone());
                Ok(products)
            }
            Err(e) => {
                warn!("listing products (condition {:?}) failed: {}", condition, e);
                self.view.notify(if condition.is_some() {
                    "Error filtering products"
                } else {
                    "Error loading products"
                });
                Err(e)
            }
        }
    }

    /// Submit the add form.
    pub async fn add_product(&mut self) -> Result<Product> {
        let body = match self.view.add_form.validate() {
            Ok(body) => body,
            Err(e) => {
                self.view.show_message(Slot::Add, MessageKind::Error, e.to_string(), Instant::now());
                return Err(e);
            }
        };

        self.view.controls.add.begin();
        self.publish_controls();
        let result = self.api.create(&body).await;
        self.view.controls.add.finish();
        self.publish_controls();

        match result {
            Ok(product) => {
                info!("added product {} ({})", product.id, product.name);
                let text = format!(
                    "Product \"{}\" added successfully with ID: {}",
                    product.name, product.id
                );
                self.view.show_message(Slot::Add, MessageKind::Success, text, Instant::now());
                self.view.add_form.clear();
                Ok(product)
            }
            Err(e) => {
                warn!("adding product {:?} failed: {}", body.name, e);
                self.view
                    .show_message(Slot::Add, MessageKind::Error, "Failed to add product", Instant::now());
                Err(e)
            }
        }
    }

    /// Open the update form pre-filled from the displayed product.
    pub fn edit_product(&mut self) -> Result<()> {
        let Some(product) = self.selected_product() else {
            self.view
                .show_message(Slot::Update, MessageKind::Error, SEARCH_FIRST, Instant::now());
            return Err(Error::NoSelection(SEARCH_FIRST.to_string()));
        };

        let form = UpdateForm::prefill(product);
        self.view.show_update_form(form);
        Ok(())
    }

    /// Submit the update form for the selected product.
    pub async fn update_product(&mut self) -> Result<Product> {
        let Some(product) = self.selected_product() else {
            self.view
                .show_message(Slot::Update, MessageKind::Error, NO_SELECTION, Instant::now());
            return Err(Error::NoSelection(NO_SELECTION.to_string()));
        };
        let id = product.id.clone();
        let name = product.name.clone();

        let fields = self.view.update_form().cloned().unwrap_or_default();
        let body = match fields.validate(&name) {
            Ok(body) => body,
            Err(e) => {
                self.view
                    .show_message(Slot::Update, MessageKind::Error, e.to_string(), Instant::now());
                return Err(e);
            }
        };

        self.view.controls.update.begin();
        self.publish_controls();
        let result = self.api.update(&id, &body).await;
        self.view.controls.update.finish();
        self.publish_controls();

        match result {
            Ok(product) => {
                info!("updated product {}", product.id);
                self.select(product.clone());
                self.view.show_message(
                    Slot::Update,
                    MessageKind::Success,
                    "Product updated successfully",
                    Instant::now(),
                );
                Ok(product)
            }
            Err(e) => {
                warn!("updating product {} failed: {}", id, e);
                self.view.show_message(
                    Slot::Update,
                    MessageKind::Error,
                    "Failed to update product",
                    Instant::now(),
                );
                Err(e)
            }
        }
    }

    pub fn cancel_update(&mut self) {
        self.view.hide_update_form();
    }

    /// Flag the selected product as damaged.
    pub async fn mark_damaged(&mut self) -> Result<Product> {
        let Some(id) = self.selected_product().map(|p| p.id.clone()) else {
            self.view.notify(NO_SELECTION);
            return Err(Error::NoSelection(NO_SELECTION.to_string()));
        };

        self.view.controls.mark_damaged.begin();
        self.publish_controls();
        let result = self.api.mark_damaged(&id).await;
        self.view.controls.mark_damaged.finish();
        self.publish_controls();

        match result {
            Ok(product) => {
                info!("marked product {} as {}", product.id, product.condition);
                self.view.set_displayed_condition(&product.condition);
                self.view.notify(format!("Product {} marked as damaged", product.id));
                Ok(product)
            }
            Err(e) => {
                warn!("marking product {} as damaged failed: {}", id, e);
                self.view.notify("Failed to mark product as damaged");
                Err(e)
            }
        }
    }

    fn requested_id(&mut self, input: &str) -> Result<ProductId> {
        form::product_id(input).inspect_err(|e| {
            self.view
                .show_message(Slot::Search, MessageKind::Error, e.to_string(), Instant::now());
        })
    }

    fn publish_controls(&self) {
        self.controls_tx.send_replace(self.view.controls.clone());
    }

    /// The displayed product, provided it is also the selection.
    fn selected_product(&self) -> Option<&Product> {
        let selected = self.selected.as_ref()?;
        self.view.details().filter(|p| &p.id == selected)
    }

    fn select(&mut self, product: Product) {
        self.selected = Some(product.id.clone());
        self.view.show_details(product);
    }
}
