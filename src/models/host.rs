use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Host {
    pub host_id: i32,
    pub host_name: String,
    pub host_since: Option<NaiveDate>,
    pub host_location: Option<String>,
    pub host_about: Option<String>,
    pub host_response_time: Option<String>,
    pub host_response_rate: Option<String>,
    pub host_acceptance_rate: Option<String>,
    pub is_superhost: bool,
    pub host_listings_count: i32,
    pub referred_by: Option<i32>,
}

// Host joined with the name of whoever referred them
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HostProfile {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub host: Host,
    pub referrer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HostSummary {
    pub host_id: i32,
    pub host_name: String,
}
