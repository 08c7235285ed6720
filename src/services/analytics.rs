use log::{error, info, warn};
use serde::Serialize;
use sqlx::PgPool;

use crate::db;
use crate::error::is_missing_table;

// Refresh order matters: host performance reads mv_listing_performance
pub const ANALYTICS_VIEWS: [&str; 5] = [
    "mv_listing_performance",
    "mv_market_overview",
    "mv_host_performance",
    "mv_neighbourhood_analytics",
    "mv_price_trends",
];

#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
pub struct MarketOverview {
    pub total_listings: i64,
    pub total_hosts: i64,
    pub superhost_count: i64,
    pub avg_price: f64,
    pub median_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_rating: f64,
    pub total_reviews: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HostPerformance {
    pub host_id: i32,
    pub host_name: String,
    pub is_superhost: bool,
    pub listing_count: i64,
    pub avg_price: f64,
    pub avg_rating: f64,
    pub review_count: i64,
    pub est_monthly_revenue: f64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NeighbourhoodAnalytics {
    pub neighbourhood: String,
    pub neighbourhood_group: Option<String>,
    pub listing_count: i64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_rating: f64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PriceTrend {
    pub month: String,
    pub room_type: String,
    pub listing_count: i64,
    pub avg_price: f64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopListing {
    pub listing_id: i32,
    pub name: String,
    pub room_type: Option<String>,
    pub price: f64,
    pub neighbourhood: Option<String>,
    pub avg_rating: f64,
    pub review_count: i64,
    pub est_monthly_revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub market_overview: MarketOverview,
    pub host_performance: Vec<HostPerformance>,
    pub neighbourhood_analytics: Vec<NeighbourhoodAnalytics>,
    pub price_trends: Vec<PriceTrend>,
    pub top_performing_listings: Vec<TopListing>,
}

#[derive(Debug, Clone, Copy)]
pub struct ReportLimits {
    pub hosts: i64,
    pub neighbourhoods: i64,
    pub listings: i64,
}

impl ReportLimits {
    pub const DASHBOARD: ReportLimits = ReportLimits {
        hosts: 15,
        neighbourhoods: 20,
        listings: 15,
    };
    pub const API: ReportLimits = ReportLimits {
        hosts: 50,
        neighbourhoods: 50,
        listings: 50,
    };
}

pub async fn get_market_overview(pool: &PgPool) -> Result<MarketOverview, sqlx::Error> {
    let overview = sqlx::query_as::<_, MarketOverview>(
        "SELECT total_listings, total_hosts, superhost_count, avg_price, median_price,
                min_price, max_price, avg_rating, total_reviews
         FROM mv_market_overview",
    )
    .fetch_optional(pool)
    .await?;
    Ok(overview.unwrap_or_default())
}

pub async fn get_host_performance(pool: &PgPool, limit: i64) -> Result<Vec<HostPerformance>, sqlx::Error> {
    sqlx::query_as::<_, HostPerformance>(
        "SELECT host_id, host_name, is_superhost, listing_count, avg_price, avg_rating,
                review_count, est_monthly_revenue
         FROM mv_host_performance
         ORDER BY est_monthly_revenue DESC, host_id
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn get_neighbourhood_analytics(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<NeighbourhoodAnalytics>, sqlx::Error> {
    sqlx::query_as::<_, NeighbourhoodAnalytics>(
        "SELECT neighbourhood, neighbourhood_group, listing_count, avg_price, min_price,
                max_price, avg_rating
         FROM mv_neighbourhood_analytics
         ORDER BY listing_count DESC, neighbourhood
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn get_price_trends(pool: &PgPool) -> Result<Vec<PriceTrend>, sqlx::Error> {
    sqlx::query_as::<_, PriceTrend>(
        "SELECT month, room_type, listing_count, avg_price
         FROM mv_price_trends
         ORDER BY month, room_type",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_top_listings(pool: &PgPool, limit: i64) -> Result<Vec<TopListing>, sqlx::Error> {
    sqlx::query_as::<_, TopListing>(
        "SELECT listing_id, name, room_type, price, neighbourhood, avg_rating,
                review_count, est_monthly_revenue
         FROM mv_listing_performance
         ORDER BY avg_rating DESC, review_count DESC, listing_id
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn get_report(pool: &PgPool, limits: ReportLimits) -> Result<AnalyticsReport, sqlx::Error> {
    Ok(AnalyticsReport {
        market_overview: get_market_overview(pool).await?,
        host_performance: get_host_performance(pool, limits.hosts).await?,
        neighbourhood_analytics: get_neighbourhood_analytics(pool, limits.neighbourhoods).await?,
        price_trends: get_price_trends(pool).await?,
        top_performing_listings: get_top_listings(pool, limits.listings).await?,
    })
}

async fn refresh_view(pool: &PgPool, view: &str) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("REFRESH MATERIALIZED VIEW {}", view))
        .execute(pool)
        .await?;
    Ok(())
}

/// Refreshes every analytics view, creating the set first if one is missing.
pub async fn refresh_analytics_views(pool: &PgPool) -> bool {
    for view in ANALYTICS_VIEWS {
        let result = match refresh_view(pool, view).await {
            Err(e) if is_missing_table(&e) => {
                warn!("{} does not exist, creating analytics views", view);
                match db::init_analytics_views(pool).await {
                    Ok(()) => refresh_view(pool, view).await,
                    Err(e) => Err(e),
                }
            }
            other => other,
        };
        if let Err(e) = result {
            error!("Failed to refresh {}: {}", view, e);
            return false;
        }
    }
    info!("Analytics views refreshed");
    true
}
