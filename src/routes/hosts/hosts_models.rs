use serde::{Deserialize, Serialize};

use crate::models::host::{Host, HostProfile, HostSummary};
use crate::models::listing::HostListing;
use crate::models::referral::ReferralMember;
use crate::query::lenient;
use crate::services::referral_network::{NetworkPosition, NetworkSummary, PerformanceMetrics};

#[derive(Debug, Default, Deserialize)]
pub struct ReferralNetworkParams {
    #[serde(default, deserialize_with = "lenient")]
    pub root_host_id: Option<i32>,
}

#[derive(Serialize)]
pub struct ReferralNetworkResponse {
    pub all_hosts: Vec<HostSummary>,
    pub selected_host: Option<i32>,
    pub network_data: Vec<ReferralMember>,
    pub network_summary: Option<NetworkSummary>,
}

#[derive(Serialize)]
pub struct HostReferralFormResponse {
    pub existing_hosts: Vec<HostSummary>,
    pub current_host: Option<Host>,
    pub is_editing: bool,
}

#[derive(Debug, Deserialize)]
pub struct HostReferralRequest {
    pub host_id: i32,
    pub referred_by: Option<i32>,
    #[serde(default)]
    pub is_superhost: bool,
}

#[derive(Serialize)]
pub struct HostListingDetail {
    #[serde(flatten)]
    pub listing: HostListing,
    pub amenities: Vec<String>,
}

#[derive(Serialize)]
pub struct HostDetailsResponse {
    pub host: HostProfile,
    pub listings: Vec<HostListingDetail>,
    pub performance: PerformanceMetrics,
    pub network_info: Option<NetworkPosition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referral_request_defaults_to_regular_host() {
        let req: HostReferralRequest =
            serde_json::from_value(serde_json::json!({ "host_id": 1003 })).unwrap();
        assert_eq!(req.referred_by, None);
        assert!(!req.is_superhost);
    }

    #[test]
    fn blank_root_host_means_no_network() {
        let params = actix_web::web::Query::<ReferralNetworkParams>::from_query("root_host_id=")
            .unwrap()
            .into_inner();
        assert_eq!(params.root_host_id, None);
    }
}
