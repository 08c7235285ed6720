use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReferralMember {
    pub network_level: i32,
    pub host_id: i32,
    pub host_name: String,
    pub referral_path: String,
    pub host_since: Option<NaiveDate>,
    pub is_superhost: bool,
    pub host_listings_count: i32,
    pub avg_listing_price: f64,
    pub total_listings: i64,
    pub individual_monthly_revenue: f64,
    #[sqlx(skip)]
    pub revenue_percentage: f64,
}

// One step up the referral chain, starting at depth 0 with the host itself
#[derive(Debug, Clone, FromRow)]
pub struct ReferralAncestor {
    pub host_id: i32,
    pub host_name: String,
    pub referred_by: Option<i32>,
    pub depth: i32,
}
