//! CLI administration tool for linkcut.
//!
//! Provides commands for managing owners and their API tokens, viewing
//! statistics, and performing database operations without requiring HTTP
//! API access.
//!
//! # Usage
//!
//! ```bash
//! # Create an owner and issue its API token
//! cargo run --bin admin -- owner create
//!
//! # List all owners
//! cargo run --bin admin -- owner list
//!
//! # Delete an owner together with its links
//! cargo run --bin admin -- owner delete 6f1c0a1e-3c4f-4a8e-9d53-2f0b7f4b8a11
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components): PostgreSQL connection
//! - `TOKEN_SIGNING_SECRET`: must match the server's value, otherwise issued
//!   tokens will not authenticate

use linkcut::application::services::auth_service::{generate_token, hash_token};
use linkcut::config::Config;
use linkcut::domain::entities::NewOwner;
use linkcut::domain::repositories::{LinkRepository, OwnerRepository};
use linkcut::infrastructure::persistence::{PgLinkRepository, PgOwnerRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for managing linkcut.
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
    /// Manage owners and their API tokens
    Owner {
        #[command(subcommand)]
        action: OwnerAction,
    },

    /// Show link statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Owner management subcommands.
#[derive(Subcommand)]
enum OwnerAction {
    /// Create an owner and issue its API token
    Create {
        /// Owner name (e.g., "CI bot", "Mobile App")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all owners
    List,

    /// Delete an owner; its active links are deleted as well
    Delete {
        /// Owner id
        id: Uuid,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
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

    let cli = Cli::parse();

    let database_url = Config::load_database_url().context("Database is not configured")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Owner { action } => handle_owner_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches owner management commands.
async fn handle_owner_action(action: OwnerAction, pool: &PgPool) -> Result<()> {
    let repo = PgOwnerRepository::new(Arc::new(pool.clone()));

    match action {
        OwnerAction::Create { name, token, yes } => create_owner(&repo, name, token, yes).await,
        OwnerAction::List => list_owners(&repo).await,
        OwnerAction::Delete { id, yes } => delete_owner(&repo, id, yes).await,
    }
}

/// Creates an owner and prints its raw token once.
///
/// Only the HMAC of the token is stored, keyed by `TOKEN_SIGNING_SECRET`.
async fn create_owner(
    repo: &PgOwnerRepository,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create Owner".bright_blue().bold());
    println!();

    let secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to issue tokens")?;

    let owner_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Owner name")
            .with_initial_text("CI bot")
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => {
            println!("{}", "✨ Generated new token".green());
            generate_token()
        }
    };

    println!();
    println!("{}", "Owner details:".bright_white().bold());
    println!("  Name:  {}", owner_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this owner?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let owner = repo
        .create(NewOwner {
            name: owner_name,
            token_hash: hash_token(&secret, &token_value),
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create owner: {}", e))?;

    println!();
    println!("{}", "✅ Owner created successfully!".green().bold());
    println!("  ID: {}", owner.id.to_string().bright_black());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/urls",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all owners with status indicators.
async fn list_owners(repo: &PgOwnerRepository) -> Result<()> {
    println!("{}", "📋 Owners".bright_blue().bold());
    println!();

    let owners = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list owners: {}", e))?;

    if owners.is_empty() {
        println!("{}", "  No owners found".yellow());
        println!();
        println!(
            "  Create one with: {} admin owner create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<36} {:<24} {:<17} {:<17} {:<8}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(106).bright_black());

    for owner in &owners {
        let status = if owner.is_deleted() {
            "DELETED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = owner
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<36} {:<24} {:<17} {:<17} {}",
            owner.id.to_string().bright_black(),
            owner.name.cyan(),
            owner
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        owners.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Soft-deletes an owner and cascades to its active links.
async fn delete_owner(repo: &PgOwnerRepository, id: Uuid, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Owner".bright_blue().bold());
    println!();

    let owner = repo
        .find_owner(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Owner not found or already deleted")?;

    println!("  Owner: {}", owner.name.cyan());
    println!("  ID:    {}", owner.id.to_string().bright_black());
    println!();
    println!(
        "{}",
        "⚠️  All active links of this owner will be deleted too.".yellow()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this owner?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let links = repo
        .soft_delete(owner.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete owner: {}", e))?;

    println!();
    println!("{}", "✅ Owner deleted successfully!".green().bold());
    println!(
        "  Links deleted: {}",
        links.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays link and owner statistics.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links = PgLinkRepository::new(Arc::new(pool.clone()));
    let stats = links
        .stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    let owners_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM owners WHERE deleted_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!(
        "  Links:         {}",
        stats.total_links.to_string().bright_green().bold()
    );
    println!(
        "    active:      {}",
        stats.active_links.to_string().bright_green()
    );
    println!(
        "    deleted:     {}",
        stats.deleted_links.to_string().bright_black()
    );
    println!(
        "  Clicks:        {}",
        stats.total_clicks.to_string().bright_green().bold()
    );
    println!(
        "  Active owners: {}",
        owners_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let links = PgLinkRepository::new(Arc::new(pool.clone()));
            if !links.health_check().await {
                anyhow::bail!("Database connection check failed");
            }

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
