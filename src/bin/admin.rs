//! CLI administration tool for the blog engine.
//!
//! Provides commands for generating admin credentials, trying out the tag
//! table, managing pingbacks and checking the database without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Generate the admin token and signing secret
//! cargo run --bin admin -- settings init
//!
//! # Show what a tag name normalizes to
//! cargo run --bin admin -- tag normalize "C#" ".NET Core"
//!
//! # List or remove pingbacks
//! cargo run --bin admin -- pingback list --page 2
//! cargo run --bin admin -- pingback clear
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (database commands only)
//! - `SETTINGS_FILE`: settings file path (default: `settings.json`)

use blog_engine::application::services::auth_service::{generate_secret, hash_token};
use blog_engine::domain::repositories::PingbackRepository;
use blog_engine::infrastructure::persistence::PgPingbackRepository;
use blog_engine::settings::{BlogSettings, SettingsPatch};
use blog_engine::utils::tag_normalizer::{normalize_name, validate_name};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// CLI tool for managing the blog engine.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to $SETTINGS_FILE, then settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage the settings file
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Inspect tag normalization
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Manage registered pingbacks
    Pingback {
        #[command(subcommand)]
        action: PingbackAction,
    },

    /// Show content counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Generate a new admin token and signing secret
    Init {
        /// Skip confirmation when credentials already exist
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Print the settings file with secrets masked
    Show,
}

#[derive(Subcommand)]
enum TagAction {
    /// Print the normalized form of each name
    Normalize {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Subcommand)]
enum PingbackAction {
    /// List pingbacks, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: i64,

        #[arg(long, default_value_t = 25)]
        page_size: i64,
    },

    /// Delete every pingback
    Clear {
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

    let settings_path = cli
        .settings
        .or_else(|| std::env::var_os("SETTINGS_FILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("settings.json"));

    match cli.command {
        Commands::Settings { action } => handle_settings_action(action, &settings_path)?,
        Commands::Tag { action } => handle_tag_action(action, &settings_path)?,
        Commands::Pingback { action } => {
            let pool = connect().await?;
            handle_pingback_action(action, &pool).await?
        }
        Commands::Stats => handle_stats(&connect().await?).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

fn handle_settings_action(action: SettingsAction, path: &Path) -> Result<()> {
    match action {
        SettingsAction::Init { yes } => init_credentials(path, yes),
        SettingsAction::Show => show_settings(path),
    }
}

/// Generates admin credentials and stores them in the settings file.
///
/// # Flow
///
/// 1. Refuse to overwrite existing credentials without confirmation
/// 2. Generate a signing secret and a token
/// 3. Store the secret and the token's HMAC, keeping other settings
/// 4. Print the raw token once
fn init_credentials(path: &Path, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔑 Initialize admin credentials".bright_blue().bold());
    println!();

    let current = BlogSettings::load(path)?;

    if current.admin_token_hash.is_some() && !skip_confirm {
        println!(
            "{}",
            "⚠️  Admin credentials already exist; the current token will stop working."
                .yellow()
        );
        let confirmed = Confirm::new()
            .with_prompt("Replace them?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let secret = generate_secret().context("Failed to generate signing secret")?;
    let token = generate_secret().context("Failed to generate token")?;

    BlogSettings::update(
        path,
        SettingsPatch {
            admin_token_hash: Some(hash_token(&secret, &token)),
            token_signing_secret: Some(secret),
            tag_normalization: None,
        },
    )?;

    println!("  File:  {}", path.display().to_string().cyan());
    println!("  Token: {}", token.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/pingbacks",
        token.bright_yellow()
    );
    println!();

    Ok(())
}

fn show_settings(path: &Path) -> Result<()> {
    let settings = BlogSettings::load(path)?;

    println!("{}", "⚙️  Settings".bright_blue().bold());
    println!();
    println!("  File:            {}", path.display().to_string().cyan());
    println!(
        "  Admin token:     {}",
        if settings.admin_token_hash.is_some() {
            "configured".green()
        } else {
            "missing".red()
        }
    );
    println!(
        "  Signing secret:  {}",
        if settings.token_signing_secret.is_some() {
            "configured".green()
        } else {
            "missing".red()
        }
    );
    println!();
    println!("  {}", "Tag normalization:".bright_white().bold());
    if settings.tag_normalization.is_empty() {
        println!("  {}", "(built-in table)".bright_black());
    }
    for rule in settings.tag_rules() {
        println!("    {:>8?} → {:?}", rule.source, rule.target);
    }
    println!();

    Ok(())
}

fn handle_tag_action(action: TagAction, path: &Path) -> Result<()> {
    let TagAction::Normalize { names } = action;
    let rules = BlogSettings::load(path)?.tag_rules();

    for name in &names {
        let name = name.trim();
        if validate_name(name) {
            println!(
                "  {:<30} {}",
                name.cyan(),
                normalize_name(name, &rules).bright_green()
            );
        } else {
            println!("  {:<30} {}", name.cyan(), "invalid".red());
        }
    }

    Ok(())
}

async fn handle_pingback_action(action: PingbackAction, pool: &PgPool) -> Result<()> {
    let repo = PgPingbackRepository::new(Arc::new(pool.clone()));

    match action {
        PingbackAction::List { page, page_size } => {
            list_pingbacks(&repo, page.max(1), page_size.clamp(1, 200)).await
        }
        PingbackAction::Clear { yes } => clear_pingbacks(&repo, yes).await,
    }
}

async fn list_pingbacks(repo: &PgPingbackRepository, page: i64, page_size: i64) -> Result<()> {
    println!("{}", "📋 Pingbacks".bright_blue().bold());
    println!();

    let total = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count pingbacks: {}", e))?;
    let pingbacks = repo
        .list(page, page_size)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list pingbacks: {}", e))?;

    if pingbacks.is_empty() {
        println!("{}", "  No pingbacks found".yellow());
        return Ok(());
    }

    println!(
        "  {:<17} {:<25} {:<35} {}",
        "Received".bright_white().bold(),
        "Domain".bright_white().bold(),
        "Target post".bright_white().bold(),
        "Source IP".bright_white().bold()
    );
    println!("  {}", "─".repeat(95).bright_black());

    for pingback in &pingbacks {
        println!(
            "  {:<17} {:<25} {:<35} {}",
            pingback
                .ping_time_utc
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            pingback.domain.cyan(),
            pingback.target_post_title,
            pingback.source_ip.bright_black()
        );
    }

    println!();
    println!(
        "  Page {} · {} of {} total",
        page,
        pingbacks.len(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn clear_pingbacks(repo: &PgPingbackRepository, skip_confirm: bool) -> Result<()> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete ALL pingbacks?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = repo
        .clear()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to clear pingbacks: {}", e))?;

    println!(
        "{} {}",
        "✅ Pingbacks removed:".green().bold(),
        removed.to_string().bright_white().bold()
    );

    Ok(())
}

/// Displays content counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    for (label, table) in [
        ("Posts", "posts"),
        ("Tags", "tags"),
        ("Categories", "categories"),
        ("Pingbacks", "pingbacks"),
    ] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await?;

        println!(
            "  {:<12} {}",
            format!("{label}:"),
            count.to_string().bright_green().bold()
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

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
