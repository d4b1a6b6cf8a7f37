//! CLI administration tool for warplet-api.
//!
//! Provides commands for inspecting and pruning the cache tables and
//! performing database checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Row counts and staleness of both caches
//! cargo run --bin admin -- stats
//!
//! # Show the cached family / NFT answer of a user
//! cargo run --bin admin -- show family 42
//! cargo run --bin admin -- show nft 42
//!
//! # Delete NFT rows not refreshed for a week
//! cargo run --bin admin -- purge nft --older-than-hours 168
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` (required): PostgreSQL connection
//! - `FAMILY_CACHE_TTL_SECONDS`, `NFT_CACHE_TTL_SECONDS` (optional): freshness
//!   windows used to label rows as stale, same defaults as the server

use warplet_api::config::{Config, cache_window};
use warplet_api::domain::entities::{CacheEntry, FamilySnapshot, NftOwnership};
use warplet_api::domain::repositories::{CacheStore, UserEventRepository};
use warplet_api::infrastructure::persistence::{
    PgFamilyCacheRepository, PgNftCacheRepository, PgUserEventRepository,
};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing warplet-api.
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
    /// Show cache and event statistics
    Stats,

    /// Show the cached row and event count of a user
    Show {
        /// Which cache to read
        cache: CacheKind,

        /// Farcaster id
        fid: i64,
    },

    /// Delete cache rows not refreshed recently
    Purge {
        /// Which cache to prune
        cache: CacheKind,

        /// Delete rows whose last refresh is older than this many hours
        #[arg(long)]
        older_than_hours: u32,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CacheKind {
    /// Best-friends family (`family_cache`)
    Family,
    /// NFT ownership (`nft_ownership_cache`)
    Nft,
}

impl CacheKind {
    fn table(self) -> &'static str {
        match self {
            CacheKind::Family => "family_cache",
            CacheKind::Nft => "nft_ownership_cache",
        }
    }
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

/// Repositories and freshness windows the commands work with.
struct Caches {
    family: PgFamilyCacheRepository,
    nft: PgNftCacheRepository,
    events: PgUserEventRepository,
    family_window: Duration,
    nft_window: Duration,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let shared = Arc::new(pool.clone());
    let caches = Caches {
        family: PgFamilyCacheRepository::new(shared.clone()),
        nft: PgNftCacheRepository::new(shared.clone()),
        events: PgUserEventRepository::new(shared),
        family_window: window_from_env("FAMILY_CACHE_TTL_SECONDS", 3600),
        nft_window: window_from_env("NFT_CACHE_TTL_SECONDS", 21_600),
    };

    match cli.command {
        Commands::Stats => handle_stats(&caches, &pool).await?,
        Commands::Show { cache, fid } => handle_show(&caches, cache, fid).await?,
        Commands::Purge {
            cache,
            older_than_hours,
            yes,
        } => handle_purge(&caches, cache, older_than_hours, yes).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn window_from_env(name: &str, default_secs: u64) -> Duration {
    let secs = std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default_secs);
    cache_window(secs)
}

/// Displays cache statistics.
///
/// Shows, per cache, the number of rows and how many of them are older than
/// the freshness window (and would be refreshed on next request), plus the
/// number of logged events.
async fn handle_stats(caches: &Caches, pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let now = Utc::now();
    let family = caches
        .family
        .stats(now - caches.family_window)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read family cache: {}", e))?;
    let nft = caches
        .nft
        .stats(now - caches.nft_window)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read NFT cache: {}", e))?;

    let events_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_events")
        .fetch_one(pool)
        .await?;

    println!(
        "  Family cache:  {} rows, {} stale (window {}s)",
        family.total.to_string().bright_green().bold(),
        family.stale.to_string().yellow(),
        caches.family_window.num_seconds()
    );
    println!(
        "  NFT cache:     {} rows, {} stale (window {}s)",
        nft.total.to_string().bright_green().bold(),
        nft.stale.to_string().yellow(),
        caches.nft_window.num_seconds()
    );
    println!(
        "  Events:        {}",
        events_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Prints one cached row with its age.
async fn handle_show(caches: &Caches, cache: CacheKind, fid: i64) -> Result<()> {
    println!(
        "{}",
        format!("🔍 {} for fid {}", cache.table(), fid)
            .bright_blue()
            .bold()
    );
    println!();

    match cache {
        CacheKind::Family => {
            let entry = caches
                .family
                .find_by_key(fid)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
            match entry {
                Some(entry) => {
                    print_age(&entry, caches.family_window);
                    print_family(&entry.value);
                }
                None => println!("{}", "  Not cached".yellow()),
            }
        }
        CacheKind::Nft => {
            let entry = caches
                .nft
                .find_by_key(fid)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
            match entry {
                Some(entry) => {
                    print_age(&entry, caches.nft_window);
                    print_nft(&entry.value);
                }
                None => println!("{}", "  Not cached".yellow()),
            }
        }
    }

    let events = caches
        .events
        .count_for_fid(fid)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    println!("  Events:  {}", events.to_string().bright_white());

    println!();
    Ok(())
}

fn print_age<V>(entry: &CacheEntry<V>, window: Duration) {
    let now = Utc::now();
    let status = if entry.is_fresh(window, now) {
        "FRESH".green()
    } else {
        "STALE".red()
    };

    println!(
        "  Updated: {} ({}s ago) {}",
        entry
            .updated_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black(),
        entry.age(now).num_seconds(),
        status
    );
}

fn print_family(family: &FamilySnapshot) {
    println!("  Members: {}", family.len().to_string().bright_white().bold());
    println!();

    if family.is_empty() {
        return;
    }

    println!(
        "  {:<10} {:<24} {:<8}",
        "FID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Score".bright_white().bold()
    );
    println!("  {}", "─".repeat(46).bright_black());

    for member in &family.members {
        println!(
            "  {:<10} {:<24} {:.3}",
            member.fid.to_string().bright_black(),
            member.username.cyan(),
            member.mutual_affinity_score
        );
    }
}

fn print_nft(ownership: &NftOwnership) {
    let holding = if ownership.holding_nft {
        "YES".green()
    } else {
        "NO".red()
    };

    println!("  Holding: {}", holding);
    if let Some(image) = &ownership.nft_image {
        println!("  Image:   {}", image.cyan());
    }
}

/// Deletes rows older than the given age, after confirmation.
///
/// The server never deletes cache rows on its own; this is the only
/// retention mechanism.
async fn handle_purge(
    caches: &Caches,
    cache: CacheKind,
    older_than_hours: u32,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🧹 Purge Cache".bright_blue().bold());
    println!();

    let cutoff = Utc::now() - Duration::hours(i64::from(older_than_hours));

    println!("  Table:  {}", cache.table().cyan());
    println!(
        "  Cutoff: {}",
        cutoff
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_white()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete rows last refreshed before the cutoff?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = match cache {
        CacheKind::Family => caches.family.purge_older_than(cutoff).await,
        CacheKind::Nft => caches.nft.purge_older_than(cutoff).await,
    }
    .map_err(|e| anyhow::anyhow!("Failed to purge {}: {}", cache.table(), e))?;

    println!(
        "{}",
        format!("✅ Removed {} rows", removed).green().bold()
    );
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
