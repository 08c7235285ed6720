use std::process::ExitCode;

use dotenv::dotenv;
use log::{error, info};

use smart_airbnb::config::AppConfig;
use smart_airbnb::db::{self, InitOutcome};
use smart_airbnb::error::AppError;

async fn run() -> Result<InitOutcome, AppError> {
    let config = AppConfig::from_env()?;
    info!(
        "Initializing database {} on {}:{} ({:?} configuration)",
        config.db.dbname, config.db.host, config.db.port, config.db.source
    );
    let pool = db::connect(&config.db, 1).await?;
    let outcome = db::initialize(&pool).await?;
    pool.close().await;
    Ok(outcome)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match run().await {
        Ok(InitOutcome::AlreadyInitialized) => {
            info!("Nothing to do, database was already initialized");
            ExitCode::SUCCESS
        }
        Ok(InitOutcome::Initialized) => {
            info!("Database initialized");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Database initialization failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
