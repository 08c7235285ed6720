use serde::{Deserialize, Serialize};

use crate::query::lenient;
use crate::services::recommendation_engine::{Recommendation, SimilarityWeights, WeightsUpdate};

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;
pub const SEARCH_LIMIT: i64 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationParams {
    #[serde(default, deserialize_with = "lenient")]
    pub limit: Option<usize>,
    #[serde(default, deserialize_with = "lenient")]
    pub threshold: Option<f64>,
}

impl RecommendationParams {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

#[derive(Serialize)]
pub struct RecommendationsResponse {
    pub listing_id: i32,
    pub recommendations: Vec<Recommendation>,
    pub weights: SimilarityWeights,
}

#[derive(Serialize)]
pub struct WeightsResponse {
    pub success: bool,
    pub weights: SimilarityWeights,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct RecommendationIndex {
    pub name: &'static str,
    pub endpoints: Vec<EndpointInfo>,
    pub weights: SimilarityWeights,
}

pub fn endpoints() -> Vec<EndpointInfo> {
    vec![
        EndpointInfo {
            method: "GET",
            path: "/api/recommendations/search?q=",
            description: "Find listings by name or neighbourhood",
        },
        EndpointInfo {
            method: "GET",
            path: "/api/recommendations/{listing_id}?limit=&threshold=",
            description: "Listings most similar to the given one",
        },
        EndpointInfo {
            method: "GET",
            path: "/api/recommendations/listing/{listing_id}",
            description: "Listing details for side by side comparison",
        },
        EndpointInfo {
            method: "GET",
            path: "/api/recommendations/weights",
            description: "Current similarity weights",
        },
        EndpointInfo {
            method: "POST",
            path: "/api/recommendations/weights",
            description: "Replace some or all similarity weights",
        },
    ]
}

#[derive(Debug, PartialEq)]
pub enum WeightsBodyError {
    Missing,
    Invalid,
}

impl WeightsBodyError {
    pub fn message(&self) -> &'static str {
        match self {
            WeightsBodyError::Missing => "No weights provided",
            WeightsBodyError::Invalid => "Invalid weights. Must sum to 1.0",
        }
    }
}

/// Parses a raw weights body; a blank body, `null` or `{}` count as missing.
pub fn parse_weights_body(body: &[u8]) -> Result<WeightsUpdate, WeightsBodyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(WeightsBodyError::Missing);
    }
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| WeightsBodyError::Invalid)?;
    if value.is_null() {
        return Err(WeightsBodyError::Missing);
    }
    let update: WeightsUpdate =
        serde_json::from_value(value).map_err(|_| WeightsBodyError::Invalid)?;
    if update.is_empty() {
        return Err(WeightsBodyError::Missing);
    }
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_empty_bodies_are_missing() {
        assert_eq!(parse_weights_body(b"").unwrap_err(), WeightsBodyError::Missing);
        assert_eq!(parse_weights_body(b"  \n").unwrap_err(), WeightsBodyError::Missing);
        assert_eq!(parse_weights_body(b"null").unwrap_err(), WeightsBodyError::Missing);
        assert_eq!(parse_weights_body(b"{}").unwrap_err(), WeightsBodyError::Missing);
    }

    #[test]
    fn malformed_or_unknown_keys_are_invalid() {
        assert_eq!(parse_weights_body(b"{price:").unwrap_err(), WeightsBodyError::Invalid);
        assert_eq!(
            parse_weights_body(br#"{"amenities": 0.2}"#).unwrap_err(),
            WeightsBodyError::Invalid
        );
        assert_eq!(
            parse_weights_body(br#"{"price": "high"}"#).unwrap_err(),
            WeightsBodyError::Invalid
        );
    }

    #[test]
    fn partial_update_is_accepted() {
        let update = parse_weights_body(br#"{"price": 0.4, "rating": 0.0}"#).unwrap();
        assert_eq!(update.price, Some(0.4));
        assert_eq!(update.rating, Some(0.0));
        assert_eq!(update.location, None);
    }

    #[test]
    fn recommendation_params_fall_back_to_defaults() {
        let params = actix_web::web::Query::<RecommendationParams>::from_query("limit=abc")
            .unwrap()
            .into_inner();
        assert_eq!(params.limit(), 10);
        assert_eq!(params.threshold(), 0.6);

        let params = actix_web::web::Query::<RecommendationParams>::from_query("limit=3&threshold=0.8")
            .unwrap()
            .into_inner();
        assert_eq!(params.limit(), 3);
        assert_eq!(params.threshold(), 0.8);
    }
}
