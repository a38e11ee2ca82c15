//! What the operator currently sees.
//!
//! The view owns every piece of display state: the details panel, the two
//! forms, the product table, inline messages, pending notifications and the
//! label/enabled state of each action control.

use std::time::Duration;

use tokio::time::Instant;

use stockdesk_core::Product;

use crate::form::{ProductForm, UpdateForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// Inline message areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Under the search box. Stays until the next search.
    Search,
    /// Under the add form. Auto-dismissed.
    Add,
    /// Under the update form. Auto-dismissed.
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    expires_at: Option<Instant>,
}

impl Message {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// A button that is disabled and relabelled while its request is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    idle_label: &'static str,
    busy_label: &'static str,
    busy: bool,
}

impl Control {
    const fn new(idle_label: &'static str, busy_label: &'static str) -> Self {
        Self {
            idle_label,
            busy_label,
            busy: false,
        }
    }

    pub fn begin(&mut self) {
        self.busy = true;
    }

    pub fn finish(&mut self) {
        self.busy = false;
    }

    pub fn label(&self) -> &'static str {
        if self.busy {
            self.busy_label
        } else {
            self.idle_label
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.busy
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub search: Control,
    pub list: Control,
    pub add: Control,
    pub update: Control,
    pub mark_damaged: Control,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            search: Control::new("Search", "Searching..."),
            list: Control::new("Filter", "Loading..."),
            add: Control::new("Add Product", "Adding..."),
            update: Control::new("Update Product", "Updating..."),
            mark_damaged: Control::new("Mark as Damaged", "Marking..."),
        }
    }
}

#[derive(Debug, Clone)]
pub struct View {
    details: Option<Product>,
    update_form: Option<UpdateForm>,
    pub add_form: ProductForm,
    rows: Vec<Product>,
    search_message: Option<Message>,
    add_message: Option<Message>,
    update_message: Option<Message>,
    notifications: Vec<String>,
    pub controls: Controls,
    message_ttl: Duration,
}

impl View {
    pub fn new(message_ttl: Duration) -> Self {
        Self {
            details: None,
            update_form: None,
            add_form: ProductForm::default(),
            rows: Vec::new(),
            search_message: None,
            add_message: None,
            update_message: None,
            notifications: Vec::new(),
            controls: Controls::default(),
            message_ttl,
        }
    }

    /// Product in the details panel, if the panel is shown.
    pub fn details(&self) -> Option<&Product> {
        self.details.as_ref()
    }

    /// Display fresh product details. Always hides the update form.
    pub fn show_details(&mut self, product: Product) {
        self.details = Some(product);
        self.update_form = None;
    }

    pub fn hide_details(&mut self) {
        self.details = None;
        self.update_form = None;
    }

    /// Change the condition shown in the details panel without re-rendering it.
    pub fn set_displayed_condition(&mut self, condition: &str) {
        if let Some(product) = self.details.as_mut() {
            product.condition = condition.to_string();
        }
    }

    pub fn update_form(&self) -> Option<&UpdateForm> {
        self.update_form.as_ref()
    }

    pub fn update_form_mut(&mut self) -> Option<&mut UpdateForm> {
        self.update_form.as_mut()
    }

    pub fn show_update_form(&mut self, form: UpdateForm) {
        self.update_form = Some(form);
    }

    pub fn hide_update_form(&mut self) {
        self.update_form = None;
    }

    pub fn rows(&self) -> &[Product] {
        &self.rows
    }

    /// Replace every table row.
    pub fn set_rows(&mut self, rows: Vec<Product>) {
        self.rows = rows;
    }

    pub fn message(&self, slot: Slot) -> Option<&Message> {
        match slot {
            Slot::Search => self.search_message.as_ref(),
            Slot::Add => self.add_message.as_ref(),
            Slot::Update => self.update_message.as_ref(),
        }
    }

    /// Show a message in `slot`, replacing whatever was there.
    pub fn show_message(&mut self, slot: Slot, kind: MessageKind, text: impl Into<String>, now: Instant) {
        let expires_at = match slot {
            Slot::Search => None,
            Slot::Add | Slot::Update => Some(now + self.message_ttl),
        };
        *self.slot_mut(slot) = Some(Message {
            kind,
            text: text.into(),
            expires_at,
        });
    }

    pub fn clear_message(&mut self, slot: Slot) {
        *self.slot_mut(slot) = None;
    }

    /// Drop every message whose display interval has elapsed.
    pub fn dismiss_expired(&mut self, now: Instant) {
        for slot in [Slot::Search, Slot::Add, Slot::Update] {
            let message = self.slot_mut(slot);
            if message.as_ref().is_some_and(|m| m.is_expired(now)) {
                *message = None;
            }
        }
    }

    /// Queue an interrupting notification.
    pub fn notify(&mut self, text: impl Into<String>) {
        self.notifications.push(text.into());
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Hand over pending notifications; each is shown once.
    pub fn take_notifications(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notifications)
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Message> {
        match slot {
            Slot::Search => &mut self.search_message,
            Slot::Add => &mut self.add_message,
            Slot::Update => &mut self.update_message,
        }
    }
}
