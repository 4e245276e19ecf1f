//! CLI administration tool for shrtn.
//!
//! Inspects and manages links directly in the PostgreSQL store, without
//! going through the HTTP API or its rate limiter.
//!
//! # Usage
//!
//! ```bash
//! # List the newest links
//! cargo run --bin admin -- links list --limit 50
//!
//! # Show one link with its most recent clicks
//! cargo run --bin admin -- links show promo2026
//!
//! # Delete a link (asks for confirmation unless --yes)
//! cargo run --bin admin -- links delete promo2026
//!
//! # Generate a value for API_KEY
//! cargo run --bin admin -- key generate
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required): PostgreSQL connection

use shrtn::application::services::LinkService;
use shrtn::config::{Config, mask_connection_string};
use shrtn::domain::repositories::{ClickRepository, LinkRepository};
use shrtn::infrastructure::persistence::{PgClickRepository, PgLinkRepository};
use shrtn::utils::code_generator::generate_code;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shrtn.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Manage the API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// List links, newest first
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: i64,

        #[arg(short, long, default_value_t = 0)]
        offset: i64,
    },

    /// Show a link and its most recent clicks
    Show {
        code: String,

        /// Number of click events to display
        #[arg(short, long, default_value_t = 10)]
        clicks: u32,
    },

    /// Delete a link
    Delete {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Print a new random API key
    Generate,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    match Cli::parse().command {
        Commands::Key { action } => handle_key_action(&action),
        command => run_with_database(command).await,
    }
}

/// Connects to PostgreSQL and runs a command that needs the store.
async fn run_with_database(command: Commands) -> Result<()> {
    let config = Config::from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL or DB_* variables must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match command {
        Commands::Links { action } => handle_link_action(action, &pool, &config).await,
        Commands::Stats => handle_stats(&pool).await,
        Commands::Db { action } => handle_db_action(action, &pool).await,
        Commands::Key { action } => handle_key_action(&action),
    }
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool, config: &Config) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let links = Arc::new(PgLinkRepository::new(pool.clone()));
    let service = LinkService::new(links, config.store_timeout());

    match action {
        LinkAction::List { limit, offset } => list_links(&service, limit, offset).await?,
        LinkAction::Show { code, clicks } => {
            let click_repo = PgClickRepository::new(pool);
            show_link(&service, &click_repo, &code, clicks).await?;
        }
        LinkAction::Delete { code, yes } => delete_link(&service, &code, yes).await?,
    }

    Ok(())
}

/// Lists links in a table.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   Code                 Clicks   Created           Target
///   ─────────────────────────────────────────────────────────────────
///   promo2026            42       2026-01-15 10:30  https://example.com/spring
/// ```
async fn list_links(service: &LinkService, limit: i64, offset: i64) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let page = service
        .list(Some(limit), Some(offset))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if page.urls.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<20} {:<8} {:<17} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &page.urls {
        println!(
            "  {:<20} {:<8} {:<17} {}",
            link.short_code.cyan(),
            link.clicks.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.original_url
        );
    }

    println!();
    println!(
        "  Showing {}-{} of {}",
        page.offset + 1,
        page.offset as usize + page.urls.len(),
        page.total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Prints one link and its most recent click events.
async fn show_link(
    service: &LinkService,
    clicks: &PgClickRepository,
    code: &str,
    click_limit: u32,
) -> Result<()> {
    let link = service
        .get_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  Code:    {}", link.short_code.cyan());
    println!("  Target:  {}", link.original_url);
    println!("  Clicks:  {}", link.clicks.to_string().bright_green().bold());
    println!("  Created: {}", link.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Updated: {}", link.updated_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  ID:      {}", link.id.bright_black());
    println!();

    let events = clicks
        .list_for_link(&link.id, click_limit, 0)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load clicks: {}", e))?;

    if events.is_empty() {
        println!("{}", "  No clicks recorded".yellow());
        println!();
        return Ok(());
    }

    println!("{}", "  Recent clicks:".bright_white().bold());
    for event in &events {
        println!(
            "  {}  {:<39} {}",
            event
                .timestamp
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black(),
            event.ip_address.as_deref().unwrap_or("-"),
            event.referer.as_deref().unwrap_or("-").bright_black()
        );
    }
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(service: &LinkService, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Link".bright_blue().bold());
    println!();

    let link = service
        .get_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Code:   {}", link.short_code.cyan());
    println!("  Target: {}", link.original_url);
    println!("  Clicks: {}", link.clicks.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!();
    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

fn handle_key_action(action: &KeyAction) -> Result<()> {
    match action {
        KeyAction::Generate => {
            let key = generate_key().map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "🔑 New API key".bright_blue().bold());
            println!();
            println!("  {}", key.bright_yellow().bold());
            println!();
            println!("{}", "Set it on the server:".bright_white());
            println!("  {}={}", "API_KEY".bright_cyan(), key);
            println!();
            println!("{}", "Then send it with every /api request:".bright_white());
            println!(
                "  curl -H \"X-API-Key: {}\" http://localhost:8080/api/urls",
                key.bright_yellow()
            );
            println!();
        }
    }

    Ok(())
}

/// Generates a 48-character alphanumeric key (~286 bits of entropy).
fn generate_key() -> Result<String, shrtn::AppError> {
    let mut key = String::with_capacity(48);
    while key.len() < 48 {
        key.push_str(&generate_code()?);
    }
    Ok(key)
}

/// Displays link and click counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM click_events")
        .fetch_one(pool)
        .await?;

    let counted: Option<i64> = sqlx::query_scalar("SELECT SUM(clicks)::BIGINT FROM short_links")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:          {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Click events:   {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!(
        "  Counted clicks: {}",
        counted.unwrap_or(0).to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            PgLinkRepository::new(Arc::new(pool.clone()))
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
