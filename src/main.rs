use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use smart_airbnb::config::AppConfig;
use smart_airbnb::db;
use smart_airbnb::error::AppError;
use smart_airbnb::routes;
use smart_airbnb::services::recommendation_engine::RecommendationEngine;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()?;
    info!(
        "Connecting to database {} on {}:{} ({:?} configuration)",
        config.db.dbname, config.db.host, config.db.port, config.db.source
    );

    let pool = db::connect(&config.db, config.max_connections).await?;

    // Logged only; the server starts either way
    if let Err(e) = db::initialize(&pool).await {
        error!("Database initialization failed: {}", e);
    }

    let engine = web::Data::new(RecommendationEngine::default());
    let server_address = config.bind_address();
    info!("Server running at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(engine.clone())
            .configure(routes::routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await?;

    Ok(())
}
