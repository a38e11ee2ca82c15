//! Plain-text rendering of the [`View`] for a terminal.

use std::fmt::Write;

use stockdesk_core::{Product, StockStatus};

use crate::view::{MessageKind, Slot, View};

/// Render everything currently visible, top to bottom.
pub fn render(view: &View) -> String {
    let mut out = String::new();

    if let Some(message) = view.message(Slot::Search) {
        line(&mut out, &message_line(message.kind, &message.text));
    }

    if let Some(product) = view.details() {
        out.push_str(&details(product));
    }

    if let Some(form) = view.update_form() {
        line(&mut out, "Update product:");
        line(&mut out, &format!("  quantity:      {}", form.quantity));
        line(&mut out, &format!("  condition:     {}", form.condition));
        line(&mut out, &format!("  restock level: {}", form.restock_level));
    }

    for slot in [Slot::Update, Slot::Add] {
        if let Some(message) = view.message(slot) {
            line(&mut out, &message_line(message.kind, &message.text));
        }
    }

    if !view.rows().is_empty() {
        out.push_str(&table(view.rows()));
    }

    out
}

/// The details panel for one product.
pub fn details(product: &Product) -> String {
    let status = product.stock_status();
    let marker = match status {
        StockStatus::Low => "!! ",
        StockStatus::Adequate => "",
    };

    let mut out = String::new();
    line(&mut out, &format!("Name:          {}", product.name));
    line(&mut out, &format!("ID:            {}", product.id));
    line(&mut out, &format!("Quantity:      {}", product.quantity));
    line(&mut out, &format!("Condition:     {}", product.condition));
    line(&mut out, &format!("Restock level: {}", product.restock_level));
    line(&mut out, &format!("{}{}", marker, status));
    out
}

/// Product table: id, name, quantity and condition, columns aligned.
pub fn table(rows: &[Product]) -> String {
    const HEADERS: [&str; 4] = ["ID", "Name", "Quantity", "Condition"];

    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|p| {
            [
                p.id.to_string(),
                p.name.clone(),
                p.quantity.to_string(),
                p.condition.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    row_line(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(&mut out, &rule.join("  "));
    for row in &cells {
        row_line(&mut out, row, &widths);
    }
    out
}

/// Notifications, framed so they stand out from the regular view.
pub fn notifications(messages: &[String]) -> String {
    let mut out = String::new();
    for message in messages {
        line(&mut out, &format!("*** {} ***", message));
    }
    out
}

fn message_line(kind: MessageKind, text: &str) -> String {
    match kind {
        MessageKind::Success => format!("[success] {}", text),
        MessageKind::Error => format!("[error] {}", text),
    }
}

fn row_line(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    line(out, padded.join("  ").trim_end());
}

fn line(out: &mut String, text: &str) {
    let _ = writeln!(out, "{}", text);
}
