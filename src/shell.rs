//! Line-oriented interactive shell over one [`AdminSession`].
//!
//! The selection carries from command to command, so `search` or `select`,
//! `edit`, `set`, `update` and `damaged` work together the way the admin page
//! does.

use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::debug;

use stockdesk_core::condition;

use crate::admin::AdminSession;
use crate::error::Result;
use crate::form::UpdateField;
use crate::render;

const PROMPT: &str = "stockdesk> ";

const HELP: &str = "\
Commands:
  search <id>              look up a product and select it
  list [condition]         list products, optionally by condition
  select <id>              select a product from the listed rows
  add                      add a product (prompts for each field)
  edit                     open the update form for the selected product
  set <field> <value>      change quantity, condition or restock in the update form
  update                   submit the update form
  cancel                   close the update form
  damaged                  mark the selected product as damaged
  show                     redraw the current view
  help                     show this help
  quit                     leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    List(Option<String>),
    Select(String),
    Add,
    Edit,
    Set(UpdateField, String),
    Update,
    Cancel,
    Damaged,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "search" => Command::Search(rest.to_string()),
            "list" | "filter" => Command::List(Some(rest.to_string()).filter(|c| !c.is_empty())),
            "select" => Command::Select(rest.to_string()),
            "add" => Command::Add,
            "edit" => Command::Edit,
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "Usage: set <quantity|condition|restock> <value>".to_string())?;
                Command::Set(field.parse()?, value.trim().to_string())
            }
            "update" => Command::Update,
            "cancel" => Command::Cancel,
            "damaged" | "mark-damaged" => Command::Damaged,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("Unknown command '{}'; type 'help' for a list", other)),
        };
        Ok(command)
    }
}

/// Run the shell until `quit` or end of input.
pub async fn run<R, W>(session: &mut AdminSession, input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(b"Inventory admin shell. Type 'help' for commands.\n").await?;

    'session: loop {
        let Some(line) = prompt(&mut lines, &mut output, PROMPT).await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(hint) => {
                output.write_all(format!("{}\n", hint).as_bytes()).await?;
                continue;
            }
        };
        debug!("shell command: {:?}", command);

        match command {
            Command::Quit => break,
            Command::Help => output.write_all(HELP.as_bytes()).await?,
            Command::Show => {}
            Command::Search(id) => surfaced(session.search_product(&id).await),
            Command::List(condition) => surfaced(session.list_products(condition.as_deref()).await),
            Command::Select(id) => surfaced(session.select_row(&id)),
            Command::Add => {
                let condition_label = format!("Condition ({}): ", condition::KNOWN.join(", "));
                let mut values = Vec::with_capacity(4);
                for label in ["Name: ", "Quantity: ", condition_label.as_str(), "Restock level: "] {
                    match prompt(&mut lines, &mut output, label).await? {
                        Some(value) => values.push(value),
                        None => break 'session,
                    }
                }
                let form = &mut session.view_mut().add_form;
                form.restock_level = values.pop().unwrap_or_default();
                form.condition = values.pop().unwrap_or_default();
                form.quantity = values.pop().unwrap_or_default();
                form.name = values.pop().unwrap_or_default();
                surfaced(session.add_product().await);
            }
            Command::Edit => surfaced(session.edit_product()),
            Command::Set(field, value) => match session.view_mut().update_form_mut() {
                Some(form) => form.set(field, value),
                None => {
                    output
                        .write_all(b"The update form is not open; use 'edit' first\n")
                        .await?;
                    continue;
                }
            },
            Command::Update => surfaced(session.update_product().await),
            Command::Cancel => session.cancel_update(),
            Command::Damaged => surfaced(session.mark_damaged().await),
        }

        session.dismiss_expired();
        let notes = session.view_mut().take_notifications();
        output.write_all(render::notifications(&notes).as_bytes()).await?;
        output.write_all(render::render(session.view()).as_bytes()).await?;
    }

    output.flush().await?;
    Ok(())
}

async fn prompt<R, W>(lines: &mut Lines<R>, output: &mut W, label: &str) -> anyhow::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(label.as_bytes()).await?;
    output.flush().await?;
    Ok(lines.next_line().await?)
}

/// Outcomes are already reflected in the view; only log them here.
fn surfaced<T>(result: Result<T>) {
    if let Err(e) = result {
        debug!("operation failed: {}", e);
    }
}
