use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::{error, info};
use sqlx::PgPool;

use super::listings_models::{
    AddListingFormResponse, AddListingRequest, DeleteListingRequest,
    HomeResponse, UpdateListingRequest, ViewListingsResponse,
};
use crate::error::{
    db_error_message, is_foreign_key_violation, is_integrity_error, is_unique_violation, AppError,
};
use crate::models::host::HostSummary;
use crate::models::listing::{HomeListing, ListingSummary};
use crate::query::listing_search::ListingSearchParams;
use crate::query::listing_update::{build_listing_update, build_neighbourhood_update};
use crate::routes::action::ActionResponse;

// Top 3 listings by average rating, cheapest first on ties
pub async fn home(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let top_listings = sqlx::query_as::<_, HomeListing>(
        "SELECT
           l.listing_id,
           l.name,
           l.price,
           n.name AS neighbourhood,
           l.minimum_nights AS min_nights,
           COALESCE(AVG(r.rating), 0)::FLOAT8 AS avg_rating
         FROM Listing l
         JOIN Neighbourhood n ON n.listing_id = l.listing_id
         LEFT JOIN Review r ON r.listing_id = l.listing_id
         GROUP BY l.listing_id, l.name, l.price, n.name
         ORDER BY avg_rating DESC, l.price ASC
         LIMIT 3",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(HomeResponse { top_listings }))
}

// Search, filter, sort and paginate listings
pub async fn view_listings(
    pool: web::Data<PgPool>,
    params: web::Query<ListingSearchParams>,
) -> Result<HttpResponse, AppError> {
    let params = params.into_inner();
    let page = params.page();
    info!("Received request to view listings, page {}", page.page);

    let mut page_query = params.build_page_query();
    let listings = page_query
        .build_query_as::<ListingSummary>()
        .fetch_all(pool.get_ref())
        .await?
        .into_iter()
        .map(ListingSummary::rounded)
        .collect();

    let mut count_query = params.build_count_query();
    let total_count: i64 = count_query
        .build_query_scalar::<i64>()
        .fetch_one(pool.get_ref())
        .await?;

    let neighbourhoods = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT name FROM Neighbourhood ORDER BY name",
    )
    .fetch_all(pool.get_ref())
    .await?;

    let room_types = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT room_type FROM Listing WHERE room_type IS NOT NULL ORDER BY room_type",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(ViewListingsResponse {
        listings,
        neighbourhoods,
        room_types,
        current_filters: params.current_filters(),
        page: page.page,
        total_pages: page.total_pages(total_count),
        total_count,
    }))
}

// Hosts for the add listing form
pub async fn add_listing_form(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let hosts = sqlx::query_as::<_, HostSummary>(
        "SELECT host_id, host_name FROM Host ORDER BY host_name",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(AddListingFormResponse { hosts }))
}

async fn insert_listing(pool: &PgPool, req: &AddListingRequest) -> Result<(), AppError> {
    req.validate().map_err(AppError::BadRequest)?;

    let mut tx = pool.begin().await?;

    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM Listing WHERE listing_id = $1")
        .bind(req.listing_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_some() {
        return Err(duplicate_listing(req.listing_id));
    }

    let today = Utc::now().date_naive();
    sqlx::query(
        "INSERT INTO Listing (
           listing_id, host_id, name, description,
           neighbourhood_overview, room_type, accommodates,
           bathrooms, bathrooms_text, bedrooms, beds,
           price, minimum_nights, maximum_nights,
           instant_bookable, created_date, last_scraped, geopoint)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                 ST_SetSRID(ST_MakePoint($18, $19), 4326)::geography)",
    )
    .bind(req.listing_id)
    .bind(req.host_id)
    .bind(req.name.trim())
    .bind(&req.description)
    .bind(&req.neighbourhood_overview)
    .bind(&req.room_type)
    .bind(req.accommodates)
    .bind(req.bathrooms)
    .bind(&req.bathrooms_text)
    .bind(req.bedrooms)
    .bind(req.beds)
    .bind(req.price)
    .bind(req.minimum_nights)
    .bind(req.maximum_nights)
    .bind(req.instant_bookable)
    .bind(today)
    .bind(today)
    .bind(req.longitude)
    .bind(req.latitude)
    .execute(&mut *tx)
    .await
    .map_err(|e| insert_error(e, req.listing_id, req.host_id))?;

    let neighbourhood_id: i32 =
        sqlx::query_scalar("SELECT COALESCE(MAX(neighbourhood_id), 0) + 1 FROM Neighbourhood")
            .fetch_one(&mut *tx)
            .await?;

    sqlx::query(
        "INSERT INTO Neighbourhood (
           neighbourhood_id, listing_id, name, neighbourhood_group, latitude, longitude)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(neighbourhood_id)
    .bind(req.listing_id)
    .bind(req.neighbourhood_name.trim())
    .bind(&req.neighbourhood_group)
    .bind(req.latitude)
    .bind(req.longitude)
    .execute(&mut *tx)
    .await
    .map_err(|e| integrity_to_bad_request(e, req.host_id))?;

    tx.commit().await?;
    Ok(())
}

fn duplicate_listing(listing_id: i32) -> AppError {
    AppError::Conflict(format!("Error: Listing ID {} already exists.", listing_id))
}

// A concurrent insert of the same id can slip past the existence check
fn insert_error(err: sqlx::Error, listing_id: i32, host_id: i32) -> AppError {
    if is_unique_violation(&err) {
        duplicate_listing(listing_id)
    } else {
        integrity_to_bad_request(err, host_id)
    }
}

fn integrity_to_bad_request(err: sqlx::Error, host_id: i32) -> AppError {
    if is_foreign_key_violation(&err) {
        AppError::BadRequest(format!("Error: Host ID {} does not exist.", host_id))
    } else if is_integrity_error(&err) {
        AppError::BadRequest(format!("Error: {}", db_error_message(&err)))
    } else {
        AppError::Database(err)
    }
}

fn integrity_to_update_error(err: sqlx::Error) -> AppError {
    if is_integrity_error(&err) {
        AppError::BadRequest(format!("Error: {}", db_error_message(&err)))
    } else {
        AppError::Database(err)
    }
}

pub async fn add_listing(
    pool: web::Data<PgPool>,
    req: web::Json<AddListingRequest>,
) -> impl Responder {
    info!("Received request to add listing: {}", req.listing_id);

    match insert_listing(pool.get_ref(), &req).await {
        Ok(()) => {
            info!("Listing {} created", req.listing_id);
            ActionResponse::ok("Listing created successfully!")
        }
        Err(e) => {
            error!("Failed to add listing {}: {}", req.listing_id, e);
            ActionResponse::failed(e)
        }
    }
}

async fn apply_listing_update(pool: &PgPool, req: &UpdateListingRequest) -> Result<(), AppError> {
    req.validate().map_err(AppError::BadRequest)?;

    let mut tx = pool.begin().await?;

    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM Listing WHERE listing_id = $1")
        .bind(req.listing_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound(format!(
            "No such listing exists: {}",
            req.listing_id
        )));
    }

    if let Some(mut qb) = build_listing_update(req) {
        qb.build()
            .execute(&mut *tx)
            .await
            .map_err(integrity_to_update_error)?;
    }

    if let Some(mut qb) = build_neighbourhood_update(req) {
        qb.build()
            .execute(&mut *tx)
            .await
            .map_err(integrity_to_update_error)?;

        if let Some((lng, lat)) = req.new_geopoint() {
            sqlx::query(
                "UPDATE Listing
                 SET geopoint = ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography
                 WHERE listing_id = $3",
            )
            .bind(lng)
            .bind(lat)
            .bind(req.listing_id)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(())
}

pub async fn update_listing(
    pool: web::Data<PgPool>,
    req: web::Json<UpdateListingRequest>,
) -> impl Responder {
    info!("Received request to update listing: {}", req.listing_id);

    match apply_listing_update(pool.get_ref(), &req).await {
        Ok(()) => ActionResponse::ok(format!("Update to listing {} successful", req.listing_id)),
        Err(e) => {
            info!("Update of listing {} rejected: {}", req.listing_id, e);
            ActionResponse::failed(e)
        }
    }
}

pub async fn delete_listing(
    pool: web::Data<PgPool>,
    req: web::Json<DeleteListingRequest>,
) -> impl Responder {
    let listing_id = req.listing_id;
    info!("Received request to delete listing: {}", listing_id);

    // Neighbourhood, reviews and amenities cascade
    let result = sqlx::query("DELETE FROM Listing WHERE listing_id = $1")
        .bind(listing_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            ActionResponse::failed(AppError::NotFound(format!("Listing ID {} not found.", listing_id)))
        }
        Ok(_) => ActionResponse::ok(format!("Listing ID {} deleted successfully.", listing_id)),
        Err(e) => {
            error!("Failed to delete listing {}: {}", listing_id, e);
            ActionResponse::failed(AppError::Database(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::fmt;

    #[derive(Debug)]
    struct PgStateError(&'static str);

    impl fmt::Display for PgStateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "sqlstate {}", self.0)
        }
    }

    impl std::error::Error for PgStateError {}

    impl DatabaseError for PgStateError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                "23505" => ErrorKind::UniqueViolation,
                "23503" => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn sqlstate(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(PgStateError(code)))
    }

    #[test]
    fn duplicate_listing_is_a_conflict() {
        let err = duplicate_listing(5001);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Error: Listing ID 5001 already exists.");
    }

    #[test]
    fn racing_insert_unique_violation_is_a_conflict() {
        let err = insert_error(sqlstate("23505"), 5001, 1001);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Error: Listing ID 5001 already exists.");
    }

    #[test]
    fn unknown_host_is_a_bad_request() {
        let err = insert_error(sqlstate("23503"), 5001, 4242);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Error: Host ID 4242 does not exist.");
    }

    #[test]
    fn non_integrity_insert_failure_stays_a_database_error() {
        let err = insert_error(sqlx::Error::PoolTimedOut, 5001, 1001);
        assert!(matches!(err, AppError::Database(_)));
    }
}
