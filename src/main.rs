use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockdesk::config::Config;
use stockdesk::form::UpdateField;
use stockdesk::{render, shell, AdminSession, HttpInventory};

/// Admin client for the inventory REST service
#[derive(Parser, Debug)]
#[command(name = "stockdesk")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of the inventory service
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a product and its stock status
    Search {
        /// Product ID
        id: String,
    },
    /// List products, optionally filtered by condition
    List {
        #[arg(long)]
        condition: Option<String>,
    },
    /// Add a new product
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        condition: String,
        #[arg(long)]
        restock_level: String,
    },
    /// Change a product's quantity, condition or restock level
    Update {
        /// Product ID
        id: String,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        restock_level: Option<String>,
    },
    /// Mark a product as damaged
    MarkDamaged {
        /// Product ID
        id: String,
    },
    /// Interactive session
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout carries the rendered view
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_ref(), args.url.as_deref())?;
    info!("Using inventory service at {}", config.base_url);

    let api = Arc::new(HttpInventory::from_config(&config)?);
    let mut session = AdminSession::new(api, config.message_ttl());

    let outcome = match args.command {
        Command::Search { id } => session.search_product(&id).await.map(drop),
        Command::List { condition } => match session.list_products(condition.as_deref()).await {
            Ok(products) if products.is_empty() => {
                println!("No products found.");
                Ok(())
            }
            other => other.map(drop),
        },
        Command::Add {
            name,
            quantity,
            condition,
            restock_level,
        } => {
            let form = &mut session.view_mut().add_form;
            form.name = name;
            form.quantity = quantity;
            form.condition = condition;
            form.restock_level = restock_level;
            session.add_product().await.map(drop)
        }
        Command::Update {
            id,
            quantity,
            condition,
            restock_level,
        } => {
            let changes = [
                (UpdateField::Quantity, quantity),
                (UpdateField::Condition, condition),
                (UpdateField::RestockLevel, restock_level),
            ];
            update(&mut session, &id, changes).await
        }
        Command::MarkDamaged { id } => mark_damaged(&mut session, &id).await,
        Command::Shell => {
            let stdin = BufReader::new(tokio::io::stdin());
            shell::run(&mut session, stdin, tokio::io::stdout()).await?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    let notes = session.view_mut().take_notifications();
    print!("{}", render::notifications(&notes));
    print!("{}", render::render(session.view()));

    Ok(match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

/// Search, open the pre-filled update form, apply the given changes, submit.
async fn update(
    session: &mut AdminSession,
    id: &str,
    changes: [(UpdateField, Option<String>); 3],
) -> stockdesk::Result<()> {
    session.search_product(id).await?;
    session.edit_product()?;
    if let Some(form) = session.view_mut().update_form_mut() {
        for (field, value) in changes {
            if let Some(value) = value {
                form.set(field, value);
            }
        }
    }
    session.update_product().await?;
    Ok(())
}

async fn mark_damaged(session: &mut AdminSession, id: &str) -> stockdesk::Result<()> {
    session.search_product(id).await?;
    session.mark_damaged().await?;
    Ok(())
}
