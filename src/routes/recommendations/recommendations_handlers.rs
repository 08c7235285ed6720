use actix_web::{web, HttpResponse, Responder};
use log::info;
use sqlx::PgPool;

use super::recommendations_models::{
    endpoints, parse_weights_body, RecommendationIndex, RecommendationParams,
    RecommendationsResponse, SearchParams, WeightsBodyError, WeightsResponse, SEARCH_LIMIT,
};
use crate::error::{AppError, ErrorResponse};
use crate::services::recommendation_engine::RecommendationEngine;

pub async fn recommendations_index(engine: web::Data<RecommendationEngine>) -> impl Responder {
    HttpResponse::Ok().json(RecommendationIndex {
        name: "Listing recommendations",
        endpoints: endpoints(),
        weights: engine.weights().await,
    })
}

pub async fn search_listings(
    pool: web::Data<PgPool>,
    engine: web::Data<RecommendationEngine>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let query = params.q.as_deref().unwrap_or_default();
    let matches = engine
        .search_listings(pool.get_ref(), query, SEARCH_LIMIT)
        .await?;
    Ok(HttpResponse::Ok().json(matches))
}

pub async fn listing_recommendations(
    pool: web::Data<PgPool>,
    engine: web::Data<RecommendationEngine>,
    path: web::Path<i32>,
    params: web::Query<RecommendationParams>,
) -> Result<HttpResponse, AppError> {
    let listing_id = path.into_inner();
    info!(
        "Received request for recommendations: listing {}, limit {}, threshold {}",
        listing_id,
        params.limit(),
        params.threshold()
    );

    let recommendations = engine
        .get_listing_recommendations(pool.get_ref(), listing_id, params.limit(), params.threshold())
        .await?;

    Ok(HttpResponse::Ok().json(RecommendationsResponse {
        listing_id,
        recommendations,
        weights: engine.weights().await,
    }))
}

pub async fn listing_details(
    pool: web::Data<PgPool>,
    engine: web::Data<RecommendationEngine>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let listing_id = path.into_inner();
    engine
        .get_listing_details_for_comparison(pool.get_ref(), listing_id)
        .await?
        .map(|details| HttpResponse::Ok().json(details))
        .ok_or_else(|| AppError::NotFound("Listing not found".into()))
}

pub async fn get_weights(engine: web::Data<RecommendationEngine>) -> impl Responder {
    HttpResponse::Ok().json(engine.weights().await)
}

pub async fn update_weights(
    engine: web::Data<RecommendationEngine>,
    body: web::Bytes,
) -> impl Responder {
    let update = match parse_weights_body(&body) {
        Ok(update) => update,
        Err(e) => {
            info!("Rejected weights update: {}", e.message());
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: e.message().to_string(),
            });
        }
    };

    match engine.update_weights(&update).await {
        Some(weights) => HttpResponse::Ok().json(WeightsResponse {
            success: true,
            weights,
        }),
        None => {
            info!("Rejected weights update {:?}", update);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: WeightsBodyError::Invalid.message().to_string(),
            })
        }
    }
}
