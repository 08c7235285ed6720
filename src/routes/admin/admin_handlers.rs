use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use sqlx::PgPool;

use super::admin_models::DeletedCounts;
use crate::db;
use crate::error::{db_error_message, is_integrity_error, is_unique_violation, AppError};
use crate::routes::action::ActionResponse;

pub async fn add_sample(pool: web::Data<PgPool>) -> impl Responder {
    info!("Received request to add sample data");

    match db::run_statements(pool.get_ref(), db::SAMPLE_SQL).await {
        Ok(executed) => {
            info!("Sample data added ({} statements)", executed);
            ActionResponse::ok("Sample data added successfully!")
        }
        Err(e) if is_unique_violation(&e) => {
            info!("Sample data already present");
            HttpResponse::Ok().json(ActionResponse {
                success: false,
                message: "Sample data has already been added.".into(),
            })
        }
        Err(e) if is_integrity_error(&e) => {
            ActionResponse::failed(AppError::BadRequest(format!("Error: {}", db_error_message(&e))))
        }
        Err(e) => {
            error!("Failed to add sample data: {}", e);
            ActionResponse::failed(AppError::Database(e))
        }
    }
}

async fn delete_everything(pool: &PgPool) -> Result<DeletedCounts, sqlx::Error> {
    let mut tx = pool.begin().await?;
    // Listings first so their dependants cascade before the hosts go
    let listings = sqlx::query("DELETE FROM Listing")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let hosts = sqlx::query("DELETE FROM Host")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;
    Ok(DeletedCounts { listings, hosts })
}

pub async fn delete_all(pool: web::Data<PgPool>) -> impl Responder {
    info!("Received request to delete all data");

    match delete_everything(pool.get_ref()).await {
        Ok(counts) => {
            info!("{}", counts.message());
            ActionResponse::ok(counts.message())
        }
        Err(e) => {
            error!("Failed to delete all data: {}", e);
            ActionResponse::failed(AppError::Database(e))
        }
    }
}
