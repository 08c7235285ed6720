use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde_json::json;
use sqlx::PgPool;

use crate::error::ErrorResponse;
use crate::routes::action::ActionResponse;
use crate::services::analytics::{self, ReportLimits};

const API_ROW_LIMIT: i64 = 50;
const NEIGHBOURHOOD_FAILURE: &str = "Failed to fetch neighbourhood analytics data";

fn internal_error(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: message.to_string(),
    })
}

// Dashboard data; an empty object when the views are unavailable
pub async fn analytics_dashboard(pool: web::Data<PgPool>) -> impl Responder {
    match analytics::get_report(pool.get_ref(), ReportLimits::DASHBOARD).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            error!("Failed to load analytics dashboard: {}", e);
            HttpResponse::Ok().json(json!({}))
        }
    }
}

pub async fn analytics_api(pool: web::Data<PgPool>) -> impl Responder {
    match analytics::get_report(pool.get_ref(), ReportLimits::API).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            error!("Failed to fetch analytics data: {}", e);
            internal_error("Failed to fetch analytics data")
        }
    }
}

pub async fn host_performance_api(pool: web::Data<PgPool>) -> impl Responder {
    match analytics::get_host_performance(pool.get_ref(), API_ROW_LIMIT).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            error!("Failed to fetch host performance: {}", e);
            internal_error("Failed to fetch host performance data")
        }
    }
}

pub async fn price_trends_api(pool: web::Data<PgPool>) -> impl Responder {
    match analytics::get_price_trends(pool.get_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            error!("Failed to fetch price trends: {}", e);
            internal_error("Failed to fetch price trends data")
        }
    }
}

pub async fn neighbourhood_api(pool: web::Data<PgPool>) -> impl Responder {
    match analytics::get_neighbourhood_analytics(pool.get_ref(), API_ROW_LIMIT).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            error!("Failed to fetch neighbourhood analytics: {}", e);
            internal_error(NEIGHBOURHOOD_FAILURE)
        }
    }
}

pub async fn refresh_analytics(pool: web::Data<PgPool>) -> impl Responder {
    info!("Received request to refresh analytics views");
    if analytics::refresh_analytics_views(pool.get_ref()).await {
        HttpResponse::Ok().json(ActionResponse {
            success: true,
            message: "Analytics data refreshed successfully".into(),
        })
    } else {
        HttpResponse::InternalServerError().json(ActionResponse {
            success: false,
            message: "Failed to refresh analytics data".into(),
        })
    }
}
