use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::listing::HostListing;
use crate::models::referral::{ReferralAncestor, ReferralMember};

pub const MAX_NETWORK_DEPTH: i32 = 5;
const MAX_ANCESTOR_DEPTH: i32 = 10;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NetworkSummary {
    pub total_agents: i64,
    pub max_depth: i32,
    pub estimated_revenue: f64,
    pub avg_rating: f64,
    pub superhosts: i64,
    pub total_listings: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct SummaryRow {
    max_depth: i32,
    avg_rating: f64,
    superhosts: i64,
    total_listings: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PerformanceMetrics {
    pub total_daily_revenue: f64,
    pub total_monthly_revenue: f64,
    pub avg_price: f64,
    pub avg_rating: f64,
    pub total_reviews: i64,
    pub total_listings: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NetworkPosition {
    pub level: i32,
    pub path: String,
}

// Members of the network rooted at `root_host_id`, level by level
pub async fn fetch_network(pool: &PgPool, root_host_id: i32) -> Result<Vec<ReferralMember>, sqlx::Error> {
    let mut members = sqlx::query_as::<_, ReferralMember>(
        "WITH RECURSIVE referral_network AS (
            SELECT h.host_id, h.host_name, h.referred_by, h.host_since, h.is_superhost,
                   h.host_listings_count, 0 AS network_level,
                   h.host_name::TEXT AS referral_path
            FROM Host h
            WHERE h.host_id = $1
            UNION ALL
            SELECT h.host_id, h.host_name, h.referred_by, h.host_since, h.is_superhost,
                   h.host_listings_count, rn.network_level + 1,
                   rn.referral_path || ' -> ' || h.host_name
            FROM Host h
            JOIN referral_network rn ON h.referred_by = rn.host_id
            WHERE rn.network_level < $2
         )
         SELECT
           rn.network_level,
           rn.host_id,
           rn.host_name,
           rn.referral_path,
           rn.host_since,
           rn.is_superhost,
           rn.host_listings_count,
           COALESCE(AVG(l.price), 0)::FLOAT8 AS avg_listing_price,
           COUNT(DISTINCT l.listing_id) AS total_listings,
           COALESCE(SUM(l.price * 30), 0)::FLOAT8 AS individual_monthly_revenue
         FROM referral_network rn
         LEFT JOIN Listing l ON rn.host_id = l.host_id
         GROUP BY rn.network_level, rn.host_id, rn.host_name, rn.referral_path,
                  rn.host_since, rn.is_superhost, rn.host_listings_count
         ORDER BY rn.network_level, rn.host_id",
    )
    .bind(root_host_id)
    .bind(MAX_NETWORK_DEPTH)
    .fetch_all(pool)
    .await?;

    apply_revenue_shares(&mut members);
    Ok(members)
}

pub fn network_revenue(members: &[ReferralMember]) -> f64 {
    members.iter().map(|m| m.individual_monthly_revenue).sum()
}

/// Fills in each member's share of the network revenue, in percent to two places.
pub fn apply_revenue_shares(members: &mut [ReferralMember]) {
    let total = network_revenue(members);
    for member in members.iter_mut() {
        member.revenue_percentage = if total > 0.0 {
            (member.individual_monthly_revenue / total * 10_000.0).round() / 100.0
        } else {
            0.0
        };
    }
}

pub async fn network_summary(
    pool: &PgPool,
    root_host_id: i32,
    members: &[ReferralMember],
) -> Result<NetworkSummary, sqlx::Error> {
    let row = sqlx::query_as::<_, SummaryRow>(
        "WITH RECURSIVE referral_network AS (
            SELECT h.host_id, h.referred_by, 0 AS network_level
            FROM Host h WHERE h.host_id = $1
            UNION ALL
            SELECT h.host_id, h.referred_by, rn.network_level + 1
            FROM Host h
            JOIN referral_network rn ON h.referred_by = rn.host_id
            WHERE rn.network_level < $2
         )
         SELECT
           COALESCE(MAX(rn.network_level), 0) AS max_depth,
           COALESCE(AVG(r.rating), 0)::FLOAT8 AS avg_rating,
           COUNT(DISTINCT CASE WHEN h.is_superhost THEN h.host_id END) AS superhosts,
           COUNT(DISTINCT l.listing_id) AS total_listings
         FROM referral_network rn
         JOIN Host h ON rn.host_id = h.host_id
         LEFT JOIN Listing l ON h.host_id = l.host_id
         LEFT JOIN Review r ON l.listing_id = r.listing_id",
    )
    .bind(root_host_id)
    .bind(MAX_NETWORK_DEPTH)
    .fetch_one(pool)
    .await?;

    Ok(NetworkSummary {
        total_agents: members.len() as i64,
        max_depth: row.max_depth,
        estimated_revenue: network_revenue(members),
        avg_rating: row.avg_rating,
        superhosts: row.superhosts,
        total_listings: row.total_listings,
    })
}

// True when `candidate` sits somewhere below `host_id` in the referral tree
pub async fn is_in_downline(
    tx: &mut Transaction<'_, Postgres>,
    host_id: i32,
    candidate: i32,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "WITH RECURSIVE downline AS (
            SELECT host_id FROM Host WHERE referred_by = $1
            UNION
            SELECT h.host_id
            FROM Host h
            JOIN downline d ON h.referred_by = d.host_id
         )
         SELECT EXISTS (SELECT 1 FROM downline WHERE host_id = $2)",
    )
    .bind(host_id)
    .bind(candidate)
    .fetch_one(&mut **tx)
    .await
}

/// The chain from a host up to the top of its referral tree, host first.
pub async fn fetch_ancestors(pool: &PgPool, host_id: i32) -> Result<Vec<ReferralAncestor>, sqlx::Error> {
    sqlx::query_as::<_, ReferralAncestor>(
        "WITH RECURSIVE chain AS (
            SELECT host_id, host_name, referred_by, 0 AS depth
            FROM Host WHERE host_id = $1
            UNION ALL
            SELECT h.host_id, h.host_name, h.referred_by, c.depth + 1
            FROM Host h
            JOIN chain c ON h.host_id = c.referred_by
            WHERE c.depth < $2
         )
         SELECT host_id, host_name, referred_by, depth
         FROM chain
         ORDER BY depth",
    )
    .bind(host_id)
    .bind(MAX_ANCESTOR_DEPTH)
    .fetch_all(pool)
    .await
}

// None unless the chain reaches a host nobody referred
pub fn network_position(chain: &[ReferralAncestor]) -> Option<NetworkPosition> {
    let root = chain.last()?;
    if root.referred_by.is_some() || chain.len() < 2 {
        return None;
    }
    let path = chain
        .iter()
        .rev()
        .map(|a| a.host_name.as_str())
        .collect::<Vec<_>>()
        .join(" → ");
    Some(NetworkPosition {
        level: root.depth,
        path,
    })
}

pub fn performance_metrics(listings: &[HostListing]) -> PerformanceMetrics {
    let total_daily_revenue: f64 = listings.iter().map(|l| l.price).sum();
    let count = listings.len();
    let (avg_price, avg_rating) = if count == 0 {
        (0.0, 0.0)
    } else {
        (
            total_daily_revenue / count as f64,
            listings.iter().map(|l| l.avg_rating).sum::<f64>() / count as f64,
        )
    };
    PerformanceMetrics {
        total_daily_revenue,
        total_monthly_revenue: total_daily_revenue * 30.0,
        avg_price,
        avg_rating,
        total_reviews: listings.iter().map(|l| l.total_reviews).sum(),
        total_listings: count,
    }
}
