use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use sqlx::PgPool;

use super::hosts_models::{
    HostDetailsResponse, HostListingDetail, HostReferralFormResponse, HostReferralRequest,
    ReferralNetworkParams, ReferralNetworkResponse,
};
use crate::error::AppError;
use crate::models::host::{Host, HostProfile, HostSummary};
use crate::models::listing::HostListing;
use crate::routes::action::ActionResponse;
use crate::services::referral_network;

const HOST_COLUMNS: &str = "host_id, host_name, host_since, host_location, host_about,
    host_response_time, host_response_rate, host_acceptance_rate,
    is_superhost, host_listings_count, referred_by";

pub async fn view_referral_network(
    pool: web::Data<PgPool>,
    params: web::Query<ReferralNetworkParams>,
) -> Result<HttpResponse, AppError> {
    let root_host_id = params.root_host_id;
    info!("Received request for referral network, root {:?}", root_host_id);

    let all_hosts = sqlx::query_as::<_, HostSummary>(
        "SELECT host_id, host_name FROM Host ORDER BY host_id",
    )
    .fetch_all(pool.get_ref())
    .await?;

    let mut network_data = Vec::new();
    let mut network_summary = None;
    if let Some(root) = root_host_id {
        network_data = referral_network::fetch_network(pool.get_ref(), root).await?;
        if !network_data.is_empty() {
            network_summary =
                Some(referral_network::network_summary(pool.get_ref(), root, &network_data).await?);
        }
    }

    Ok(HttpResponse::Ok().json(ReferralNetworkResponse {
        all_hosts,
        selected_host: root_host_id,
        network_data,
        network_summary,
    }))
}

async fn referral_form(pool: &PgPool, host_id: Option<i32>) -> Result<HttpResponse, AppError> {
    let existing_hosts = sqlx::query_as::<_, HostSummary>(
        "SELECT host_id, host_name FROM Host ORDER BY host_id LIMIT 500",
    )
    .fetch_all(pool)
    .await?;

    let current_host = match host_id {
        Some(id) => {
            sqlx::query_as::<_, Host>(&format!("SELECT {} FROM Host WHERE host_id = $1", HOST_COLUMNS))
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        None => None,
    };

    Ok(HttpResponse::Ok().json(HostReferralFormResponse {
        existing_hosts,
        current_host,
        is_editing: host_id.is_some(),
    }))
}

pub async fn add_host_referral_form(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    referral_form(pool.get_ref(), None).await
}

pub async fn edit_host_referral_form(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    referral_form(pool.get_ref(), Some(path.into_inner())).await
}

async fn host_exists<'e, E>(executor: E, host_id: i32) -> Result<bool, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM Host WHERE host_id = $1")
        .bind(host_id)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

async fn link_host(pool: &PgPool, req: &HostReferralRequest) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    if !host_exists(&mut *tx, req.host_id).await? {
        return Err(AppError::NotFound(format!("Host ID {} not found.", req.host_id)));
    }

    if let Some(referrer) = req.referred_by {
        if referrer == req.host_id {
            return Err(AppError::BadRequest("A host cannot refer themselves.".into()));
        }
        if !host_exists(&mut *tx, referrer).await? {
            return Err(AppError::NotFound(format!("Referrer ID {} not found.", referrer)));
        }
        if referral_network::is_in_downline(&mut tx, req.host_id, referrer).await? {
            return Err(AppError::BadRequest(format!(
                "Host {} is in the referral network of host {}; linking them would create a cycle.",
                referrer, req.host_id
            )));
        }
    }

    sqlx::query("UPDATE Host SET referred_by = $1, is_superhost = $2 WHERE host_id = $3")
        .bind(req.referred_by)
        .bind(req.is_superhost)
        .bind(req.host_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

async fn link_response(pool: &PgPool, req: &HostReferralRequest) -> HttpResponse {
    info!(
        "Received request to link host {} to referrer {:?}",
        req.host_id, req.referred_by
    );

    match link_host(pool, req).await {
        Ok(()) => ActionResponse::ok("Host successfully linked to referral network!"),
        Err(e) => {
            error!("Failed to link host {}: {}", req.host_id, e);
            ActionResponse::failed(e)
        }
    }
}

pub async fn add_host_referral(
    pool: web::Data<PgPool>,
    req: web::Json<HostReferralRequest>,
) -> impl Responder {
    link_response(pool.get_ref(), &req).await
}

// The path names the host being edited; the body must agree with it
pub async fn edit_host_referral(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    req: web::Json<HostReferralRequest>,
) -> impl Responder {
    let path_host_id = path.into_inner();
    if path_host_id != req.host_id {
        info!(
            "Rejected referral update: path host {} but body host {}",
            path_host_id, req.host_id
        );
        return ActionResponse::failed(AppError::BadRequest(format!(
            "Host ID {} in the path does not match host ID {} in the request.",
            path_host_id, req.host_id
        )));
    }
    link_response(pool.get_ref(), &req).await
}

async fn listing_amenities(
    pool: &PgPool,
    listing_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<String>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i32, String)>(
        "SELECT listing_id, amenity
         FROM ListingAmenity
         WHERE listing_id = ANY($1)
         ORDER BY listing_id, amenity",
    )
    .bind(listing_ids)
    .fetch_all(pool)
    .await?;

    let mut amenities: HashMap<i32, Vec<String>> = HashMap::new();
    for (listing_id, amenity) in rows {
        amenities.entry(listing_id).or_default().push(amenity);
    }
    Ok(amenities)
}

pub async fn host_details(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let host_id = path.into_inner();
    info!("Received request for host details: {}", host_id);

    let host = sqlx::query_as::<_, HostProfile>(
        "SELECT h.host_id, h.host_name, h.host_since, h.host_location, h.host_about,
                h.host_response_time, h.host_response_rate, h.host_acceptance_rate,
                h.is_superhost, h.host_listings_count, h.referred_by,
                r.host_name AS referrer_name
         FROM Host h
         LEFT JOIN Host r ON h.referred_by = r.host_id
         WHERE h.host_id = $1",
    )
    .bind(host_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Host with ID {} not found.", host_id)))?;

    let listings = sqlx::query_as::<_, HostListing>(
        "SELECT l.listing_id, l.name, l.description, l.room_type, l.accommodates,
                l.price, l.minimum_nights, l.maximum_nights, l.instant_bookable,
                l.created_date, l.last_scraped,
                n.name AS neighbourhood_name, n.neighbourhood_group,
                n.latitude, n.longitude,
                COALESCE(AVG(r.rating), 0)::FLOAT8 AS avg_rating,
                COUNT(r.review_id) AS review_count,
                COALESCE(SUM(r.number_of_reviews), 0)::INT8 AS total_reviews
         FROM Listing l
         LEFT JOIN Neighbourhood n ON l.listing_id = n.listing_id
         LEFT JOIN Review r ON l.listing_id = r.listing_id
         WHERE l.host_id = $1
         GROUP BY l.listing_id, n.name, n.neighbourhood_group, n.latitude, n.longitude
         ORDER BY l.created_date DESC, l.listing_id",
    )
    .bind(host_id)
    .fetch_all(pool.get_ref())
    .await?;

    let performance = referral_network::performance_metrics(&listings);

    let mut amenities = if listings.is_empty() {
        HashMap::new()
    } else {
        listing_amenities(pool.get_ref(), listings.iter().map(|l| l.listing_id).collect()).await?
    };

    let network_info = if host.host.referred_by.is_some() {
        let chain = referral_network::fetch_ancestors(pool.get_ref(), host_id).await?;
        referral_network::network_position(&chain)
    } else {
        None
    };

    let listings = listings
        .into_iter()
        .map(|listing| HostListingDetail {
            amenities: amenities.remove(&listing.listing_id).unwrap_or_default(),
            listing,
        })
        .collect();

    Ok(HttpResponse::Ok().json(HostDetailsResponse {
        host,
        listings,
        performance,
        network_info,
    }))
}
