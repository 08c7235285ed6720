use log::info;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor, PgPool};

use crate::config::DbConfig;

pub mod sql;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");
const ANALYTICS_SQL: &str = include_str!("../../sql/analytics.sql");
pub const SAMPLE_SQL: &str = include_str!("../../sql/sample.sql");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    AlreadyInitialized,
    Initialized,
}

pub fn connect_options(config: &DbConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.dbname)
}

pub async fn connect(config: &DbConfig, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_options(config))
        .await
}

// The listing table marks a database that has been set up before
pub async fn is_initialized(pool: &PgPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = 'listing'
        )",
    )
    .fetch_one(pool)
    .await
}

// Runs as one script so the dollar-quoted trigger bodies stay intact
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(SCHEMA_SQL).await?;
    Ok(())
}

pub async fn init_analytics_views(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(ANALYTICS_SQL).await?;
    Ok(())
}

/// Runs a script of plain statements inside one transaction.
pub async fn run_statements(pool: &PgPool, script: &str) -> Result<usize, sqlx::Error> {
    let statements = sql::split_statements(script);
    let mut tx = pool.begin().await?;
    for stmt in &statements {
        sqlx::query(stmt).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(statements.len())
}

pub async fn load_seed_data_if_needed(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let listing_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Listing")
        .fetch_one(pool)
        .await?;

    if listing_count > 0 {
        info!("Listing table already holds {} rows, skipping seed data", listing_count);
        return Ok(false);
    }

    let executed = run_statements(pool, SAMPLE_SQL).await?;
    info!("Seed data loaded ({} statements)", executed);
    Ok(true)
}

pub async fn initialize(pool: &PgPool) -> Result<InitOutcome, sqlx::Error> {
    if is_initialized(pool).await? {
        info!("Database already initialized. Skipping.");
        return Ok(InitOutcome::AlreadyInitialized);
    }

    info!("Initializing database schema...");
    init_schema(pool).await?;
    info!("Schema created successfully");

    info!("Loading seed data...");
    load_seed_data_if_needed(pool).await?;

    info!("Initializing analytics views...");
    init_analytics_views(pool).await?;
    info!("Analytics views created");

    info!("Database initialization complete");
    Ok(InitOutcome::Initialized)
}
