//! Backend entry-point: serves the HTTP API and runs maintenance commands.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use geocache::domain::ports::ProfileCommand;
use geocache::domain::{DemoSeeder, ProfileService, UserId};
use geocache::inbound::http::health::HealthState;
use geocache::inbound::http::session_config::fingerprint::key_fingerprint;
use geocache::inbound::http::session_config::{BuildMode, session_settings_from_env};
use geocache::outbound::persistence::{
    DbPool, DieselAdminRegistry, DieselCacheRepository, DieselProfileRepository, PoolConfig,
    run_pending_migrations,
};
use geocache::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Geocache backend.
#[derive(Debug, Parser)]
#[command(name = "geocache", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
    /// Insert the demo caches for a profile.
    SeedDemo {
        /// Profile that will own the demo caches.
        #[arg(long)]
        author: i64,
    },
    /// Add a profile to the admin set.
    GrantAdmin {
        /// Profile id.
        user_id: i64,
    },
    /// Remove a profile from the admin set.
    RevokeAdmin {
        /// Profile id.
        user_id: i64,
    },
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = AppSettings::load_from_iter([OsString::from("geocache")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&settings).await,
        Command::Migrate => migrate(&settings).await,
        Command::SeedDemo { author } => {
            let pool = connect(&settings).await?;
            seed_demo(&pool, UserId::new(author)).await
        }
        Command::GrantAdmin { user_id } => set_admin(&settings, user_id, true).await,
        Command::RevokeAdmin { user_id } => set_admin(&settings, user_id, false).await,
    }
}

fn database_url(settings: &AppSettings) -> Result<&str> {
    settings
        .database_url
        .as_deref()
        .ok_or_else(|| eyre!("GEOCACHE_DATABASE_URL is required for this command"))
}

async fn connect(settings: &AppSettings) -> Result<DbPool> {
    let config = PoolConfig::new(database_url(settings)?).with_max_size(settings.pool_size()?);
    DbPool::new(config)
        .await
        .wrap_err("failed to build the database pool")
}

async fn migrate(settings: &AppSettings) -> Result<()> {
    let applied = run_pending_migrations(database_url(settings)?)
        .await
        .wrap_err("failed to apply migrations")?;
    info!(applied, "migrations applied");
    Ok(())
}

async fn seed_demo(pool: &DbPool, author: UserId) -> Result<()> {
    let seeder = DemoSeeder::new(
        Arc::new(DieselCacheRepository::new(pool.clone())),
        Arc::new(DieselProfileRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    );
    seeder
        .seed(author)
        .await
        .map_err(|err| eyre!("demo seeding failed: {}", err.message()))?;
    Ok(())
}

async fn set_admin(settings: &AppSettings, user_id: i64, admin: bool) -> Result<()> {
    let pool = connect(settings).await?;
    let profiles = ProfileService::new(
        Arc::new(DieselProfileRepository::new(pool.clone())),
        Arc::new(DieselAdminRegistry::new(pool)),
    );
    let changed = profiles
        .set_admin(UserId::new(user_id), admin)
        .await
        .map_err(|err| eyre!("admin update failed: {}", err.message()))?;
    if !changed {
        info!(user_id, admin, "admin membership already in the requested state");
    }
    Ok(())
}

async fn serve(settings: &AppSettings) -> Result<()> {
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())
        .wrap_err("invalid session configuration")?;
    info!(
        key_fingerprint = %key_fingerprint(&session.key),
        signer_fingerprint = %session.url_signer().fingerprint(),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(session, bind_addr);
    if settings.database_url.is_some() {
        if settings.migrate_on_start {
            migrate(settings).await?;
        }
        let pool = connect(settings).await?;
        if let Some(author) = settings.seed_demo_author {
            seed_demo(&pool, UserId::new(author)).await?;
        }
        config = config.with_db_pool(pool);
    } else {
        warn!("GEOCACHE_DATABASE_URL not set; using the in-memory store");
        if settings.seed_demo_author.is_some() {
            warn!("demo seeding needs a database; skipping");
        }
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    create_server(health_state, config)?
        .await
        .wrap_err("server terminated with an error")
}
