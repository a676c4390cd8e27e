//! Back-office command line for the storefront service.
//!
//! Issues and revokes the bearer tokens that guard `/api/admin/*`, inspects
//! coupons, and checks the database, all directly against Postgres.
//!
//! ```bash
//! cargo run --bin admin -- token create --name "Back office"
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "Back office"
//!
//! cargo run --bin admin -- coupon list --limit 10
//! cargo run --bin admin -- coupon check SAVE10
//!
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db info
//! ```
//!
//! Reads the same database settings as the server (`DATABASE_URL` or the
//! `DB_*` parts). `token create` also needs the server's
//! `TOKEN_SIGNING_SECRET`, otherwise the stored digest will never match.

use storefront::application::services::{CouponService, hash_token};
use storefront::config::{DatabaseConfig, mask_connection_string};
use storefront::domain::entities::{Coupon, DiscountType};
use storefront::domain::errors::CouponError;
use storefront::domain::repositories::{ApiToken, CouponRepository, TokenLookup, TokenRepository};
use storefront::infrastructure::persistence::{PgCouponRepository, PgTokenRepository};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

const TOKEN_LEN: usize = 48;
const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Parser)]
#[command(name = "admin", author, version, about = "Storefront back-office tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Admin API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Coupon inspection
    Coupon {
        #[command(subcommand)]
        action: CouponAction,
    },

    /// Database diagnostics
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a token for a back-office client
    Create {
        /// Client name, e.g. "Back office" or "Support tools"
        #[arg(short, long)]
        name: Option<String>,

        /// Use this value instead of a generated one
        #[arg(short, long)]
        token: Option<String>,

        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show every token with its status
    List,

    /// Revoke a token by id or name
    Revoke { name_or_id: String },
}

#[derive(Subcommand)]
enum CouponAction {
    /// Newest coupons first
    List {
        #[arg(short, long, default_value_t = 25)]
        limit: i64,
    },

    /// Run the public validation rules against a code, without using it up
    Check { code: String },
}

#[derive(Subcommand)]
enum DbAction {
    /// Round-trip a trivial query
    Check,

    /// Server version and row counts
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let db = DatabaseConfig::from_env().context("Database settings are incomplete")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(db.acquire_timeout)
        .connect(&db.url)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_connection_string(&db.url)))?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::Token { action } => {
            let tokens = PgTokenRepository::new(pool);
            match action {
                TokenAction::Create { name, token, yes } => {
                    let secret = std::env::var("TOKEN_SIGNING_SECRET")
                        .context("TOKEN_SIGNING_SECRET must be set to issue tokens")?;
                    create_token(&tokens, &secret, name, token, yes).await
                }
                TokenAction::List => list_tokens(&tokens).await,
                TokenAction::Revoke { name_or_id } => revoke_token(&tokens, &name_or_id).await,
            }
        }
        Commands::Coupon { action } => {
            let coupons = Arc::new(PgCouponRepository::new(pool));
            match action {
                CouponAction::List { limit } => list_coupons(coupons.as_ref(), limit).await,
                CouponAction::Check { code } => check_coupon(coupons, &code).await,
            }
        }
        Commands::Db { action } => match action {
            DbAction::Check => db_check(&pool).await,
            DbAction::Info => db_info(&pool).await,
        },
    }
}

/// Prompts for anything missing, shows the raw token once, then stores
/// only its HMAC digest.
async fn create_token(
    repo: &PgTokenRepository,
    signing_secret: &str,
    name: Option<String>,
    token: Option<String>,
    yes: bool,
) -> Result<()> {
    println!("{}", "🔑 Issue admin token".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Client name")
            .with_initial_text("Back office")
            .interact_text()?,
    };

    let raw = token.unwrap_or_else(generate_token);

    println!("  Client: {}", name.cyan());
    println!("  Token:  {}", raw.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  This is the only time the token is shown. Store it now."
            .red()
            .bold()
    );
    println!();

    if !yes && !confirm("Store this token?", true)? {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let stored = repo
        .create_token(&name, &hash_token(signing_secret, &raw))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to store token: {e}"))?;

    println!(
        "{} {} (id {})",
        "✅ Token issued for".green().bold(),
        stored.name.cyan(),
        stored.id
    );
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/admin/coupons",
        raw.bright_yellow()
    );

    Ok(())
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {e}"))?;

    if tokens.is_empty() {
        println!("{}", "No admin tokens yet. Issue one with `admin token create`.".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<28} {:<17} {:<17} {}",
        "ID".bold(),
        "Client".bold(),
        "Issued".bold(),
        "Last used".bold(),
        "Status".bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for token in &tokens {
        println!(
            "  {:<5} {:<28} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            short_time(token.created_at).bright_black(),
            token
                .last_used_at
                .map(short_time)
                .unwrap_or_else(|| "never".into())
                .bright_black(),
            token_status(token)
        );
    }

    let active = tokens.iter().filter(|t| !t.is_revoked()).count();
    println!();
    println!("  {active} active, {} revoked", tokens.len() - active);

    Ok(())
}

async fn revoke_token(repo: &PgTokenRepository, name_or_id: &str) -> Result<()> {
    let token = repo
        .find(TokenLookup::parse(name_or_id))
        .await
        .map_err(|e| anyhow::anyhow!("Token lookup failed: {e}"))?
        .with_context(|| format!("No token matches '{name_or_id}'"))?;

    if token.is_revoked() {
        println!("{} {}", "⚠️  Already revoked:".yellow(), token.name.cyan());
        return Ok(());
    }

    println!("  Client: {} (id {})", token.name.cyan(), token.id);
    if !confirm("Revoke this token? Clients using it will get 401.", false)? {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {e}"))?;

    println!("{}", "✅ Token revoked".green().bold());
    Ok(())
}

async fn list_coupons(repo: &PgCouponRepository, limit: i64) -> Result<()> {
    let total = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count coupons: {e}"))?;
    let coupons = repo
        .list(0, limit.max(1))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list coupons: {e}"))?;

    if coupons.is_empty() {
        println!("{}", "No coupons".yellow());
        return Ok(());
    }

    println!(
        "  {:<20} {:<10} {:<10} {:<25} {}",
        "Code".bold(),
        "Discount".bold(),
        "Used".bold(),
        "Window".bold(),
        "Enabled".bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for coupon in &coupons {
        println!(
            "  {:<20} {:<10} {:<10} {:<25} {}",
            coupon.code.cyan(),
            discount_label(coupon),
            usage_label(coupon).bright_black(),
            format!(
                "{} → {}",
                coupon.valid_from.format("%Y-%m-%d"),
                coupon.valid_to.format("%Y-%m-%d")
            )
            .bright_black(),
            if coupon.is_active { "yes".green() } else { "no".red() }
        );
    }

    println!();
    println!("  Showing {} of {total}", coupons.len());

    Ok(())
}

/// Same rules as `POST /api/coupons/validate`, including the check order.
async fn check_coupon(repo: Arc<PgCouponRepository>, code: &str) -> Result<()> {
    let service = CouponService::new(repo);

    match service.validate(code).await {
        Ok(coupon) => {
            println!("{} {}", "✅ Usable:".green().bold(), coupon.code.cyan());
            println!(
                "   {} off, used {}, valid until {}",
                discount_label(&coupon),
                usage_label(&coupon),
                short_time(coupon.valid_to)
            );
        }
        Err(CouponError::Store(e)) => {
            return Err(anyhow::anyhow!("Coupon lookup failed: {e}"));
        }
        Err(rejection) => {
            println!("{} {rejection}", "❌ Rejected:".red().bold());
        }
    }

    Ok(())
}

async fn db_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    println!("{}", "✅ Database reachable".green().bold());
    Ok(())
}

async fn db_info(pool: &PgPool) -> Result<()> {
    let version: String = sqlx::query_scalar("SELECT version()").fetch_one(pool).await?;
    let (coupons, usable): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COUNT(*) FILTER (
                   WHERE is_active
                     AND NOW() BETWEEN valid_from AND valid_to
                     AND (usage_limit IS NULL OR usage_count < usage_limit)
               )
        FROM coupons
        "#,
    )
    .fetch_one(pool)
    .await?;
    let tokens: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!("  PostgreSQL:     {}", version.bright_white());
    println!("  Coupons:        {} ({} usable now)", coupons.to_string().bold(), usable);
    println!("  Active tokens:  {}", tokens.to_string().bold());

    Ok(())
}

fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(default).interact()?)
}

fn token_status(token: &ApiToken) -> ColoredString {
    if token.is_revoked() {
        "REVOKED".red()
    } else {
        "ACTIVE".green()
    }
}

fn discount_label(coupon: &Coupon) -> String {
    match coupon.discount_type {
        DiscountType::Percentage => format!("{}%", coupon.discount_value),
        DiscountType::Fixed => format!("{} flat", coupon.discount_value),
    }
}

fn usage_label(coupon: &Coupon) -> String {
    match coupon.usage_limit {
        Some(limit) => format!("{}/{limit}", coupon.usage_count),
        None => format!("{}/∞", coupon.usage_count),
    }
}

fn short_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// 48 random alphanumerics from the thread-local CSPRNG.
fn generate_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}
