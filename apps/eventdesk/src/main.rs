mod commands;
mod config;
mod prompt;
mod render;
mod shell;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpEventApi, NotificationDispatcher};
use shared::domain::CategoryFilter;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    commands::AppContext,
    prompt::{PreConfirmed, TerminalConfirm},
};

#[derive(Parser, Debug)]
#[command(name = "eventdesk", about = "Manage work, personal, and other events")]
struct Cli {
    /// Base URL of the events service, e.g. http://localhost:5000/api
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// TOML settings file; defaults to ./eventdesk.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the event list
    List {
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
    },
    /// Create an event
    Create {
        #[arg(long)]
        title: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:mm
        #[arg(long)]
        time: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Archive an event by id
    Archive { id: String },
    /// Delete an event by id
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Interactive mode
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = config::load_settings(cli.config.as_deref(), cli.api_url.as_deref())?;
    info!(api_url = %settings.api_url, "using events service");

    let http = reqwest::Client::builder()
        .timeout(settings.request_timeout())
        .build()
        .context("failed to build HTTP client")?;
    let api = HttpEventApi::with_client(http, settings.api_url.clone());

    NotificationDispatcher::install_global(NotificationDispatcher::with_default_duration(
        settings.notification_duration(),
    ));
    let ctx = AppContext {
        api: Arc::new(api),
        notifications: NotificationDispatcher::global().clone(),
    };

    match cli.command {
        Command::List { category } => commands::list(&ctx, category).await,
        Command::Create {
            title,
            date,
            time,
            notes,
        } => commands::create(&ctx, title, date, time, notes).await,
        Command::Archive { id } => commands::archive(&ctx, &id).await,
        Command::Delete { id, yes } => {
            if yes {
                commands::delete(&ctx, &id, &PreConfirmed).await
            } else {
                commands::delete(&ctx, &id, &TerminalConfirm).await
            }
        }
        Command::Shell => shell::run(&ctx).await,
    }
}
