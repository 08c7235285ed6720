//! Listing recommendations by weighted feature similarity.
//!
//! Every feature similarity is normalised to `[0, 1]` and the overall score is
//! the weighted sum, so with valid weights the score is also in `[0, 1]`.

use std::cmp::Ordering;

use log::info;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::sync::RwLock;

const EARTH_RADIUS_KM: f64 = 6371.0;
// Distance at which location similarity drops to one half
const LOCATION_HALF_KM: f64 = 5.0;
const MAX_RATING: f64 = 5.0;
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    pub price: f64,
    pub location: f64,
    pub room_type: f64,
    pub capacity: f64,
    pub rating: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        SimilarityWeights {
            price: 0.30,
            location: 0.25,
            room_type: 0.20,
            capacity: 0.15,
            rating: 0.10,
        }
    }
}

impl SimilarityWeights {
    fn values(&self) -> [f64; 5] {
        [self.price, self.location, self.room_type, self.capacity, self.rating]
    }

    pub fn is_valid(&self) -> bool {
        let values = self.values();
        values.iter().all(|w| w.is_finite() && (0.0..=1.0).contains(w))
            && (values.iter().sum::<f64>() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}

/// Partial weight update; omitted weights keep their current value.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightsUpdate {
    pub price: Option<f64>,
    pub location: Option<f64>,
    pub room_type: Option<f64>,
    pub capacity: Option<f64>,
    pub rating: Option<f64>,
}

impl WeightsUpdate {
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.location.is_none()
            && self.room_type.is_none()
            && self.capacity.is_none()
            && self.rating.is_none()
    }

    pub fn apply_to(&self, current: SimilarityWeights) -> SimilarityWeights {
        SimilarityWeights {
            price: self.price.unwrap_or(current.price),
            location: self.location.unwrap_or(current.location),
            room_type: self.room_type.unwrap_or(current.room_type),
            capacity: self.capacity.unwrap_or(current.capacity),
            rating: self.rating.unwrap_or(current.rating),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ListingFeatures {
    pub listing_id: i32,
    pub name: String,
    pub price: f64,
    pub room_type: Option<String>,
    pub accommodates: Option<i32>,
    pub neighbourhood: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    pub price: f64,
    pub location: f64,
    pub room_type: f64,
    pub capacity: f64,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub listing: ListingFeatures,
    pub similarity_score: f64,
    pub breakdown: SimilarityBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ListingMatch {
    pub listing_id: i32,
    pub name: String,
    pub price: f64,
    pub room_type: Option<String>,
    pub neighbourhood: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ListingDetail {
    pub listing_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub room_type: Option<String>,
    pub accommodates: Option<i32>,
    pub bedrooms: Option<i32>,
    pub beds: Option<i32>,
    pub bathrooms: Option<f64>,
    pub price: f64,
    pub minimum_nights: Option<i32>,
    pub maximum_nights: Option<i32>,
    pub instant_bookable: bool,
    pub host_id: i32,
    pub host_name: String,
    pub is_superhost: bool,
    pub neighbourhood: Option<String>,
    pub neighbourhood_group: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub avg_rating: Option<f64>,
    pub review_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingComparison {
    #[serde(flatten)]
    pub listing: ListingDetail,
    pub amenities: Vec<String>,
}

// Relative difference mapped onto [0, 1]
fn ratio_similarity(a: f64, b: f64) -> f64 {
    let max = a.abs().max(b.abs());
    if max == 0.0 {
        return 1.0;
    }
    (1.0 - (a - b).abs() / max).clamp(0.0, 1.0)
}

pub fn price_similarity(a: f64, b: f64) -> f64 {
    ratio_similarity(a, b)
}

pub fn capacity_similarity(a: Option<i32>, b: Option<i32>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => ratio_similarity(a as f64, b as f64),
        _ => 0.0,
    }
}

pub fn room_type_similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a.trim().eq_ignore_ascii_case(b.trim()) => 1.0,
        _ => 0.0,
    }
}

pub fn rating_similarity(a: Option<f64>, b: Option<f64>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => (1.0 - (a - b).abs() / MAX_RATING).clamp(0.0, 1.0),
        _ => 0.5,
    }
}

pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

pub fn location_similarity(a: &ListingFeatures, b: &ListingFeatures) -> f64 {
    match (a.latitude, a.longitude, b.latitude, b.longitude) {
        (Some(lat1), Some(lng1), Some(lat2), Some(lng2)) => {
            1.0 / (1.0 + haversine_km(lat1, lng1, lat2, lng2) / LOCATION_HALF_KM)
        }
        _ => 0.0,
    }
}

pub fn similarity(
    weights: &SimilarityWeights,
    target: &ListingFeatures,
    candidate: &ListingFeatures,
) -> (f64, SimilarityBreakdown) {
    let breakdown = SimilarityBreakdown {
        price: price_similarity(target.price, candidate.price),
        location: location_similarity(target, candidate),
        room_type: room_type_similarity(target.room_type.as_deref(), candidate.room_type.as_deref()),
        capacity: capacity_similarity(target.accommodates, candidate.accommodates),
        rating: rating_similarity(target.avg_rating, candidate.avg_rating),
    };
    let score = weights.price * breakdown.price
        + weights.location * breakdown.location
        + weights.room_type * breakdown.room_type
        + weights.capacity * breakdown.capacity
        + weights.rating * breakdown.rating;
    (score, breakdown)
}

/// Scores every candidate other than the target, keeps those at or above
/// `threshold`, best first (ties by listing id), at most `max_results`.
pub fn rank(
    weights: &SimilarityWeights,
    target: &ListingFeatures,
    candidates: Vec<ListingFeatures>,
    max_results: usize,
    threshold: f64,
) -> Vec<Recommendation> {
    let mut scored: Vec<(f64, ListingFeatures, SimilarityBreakdown)> = candidates
        .into_iter()
        .filter(|c| c.listing_id != target.listing_id)
        .filter_map(|candidate| {
            let (score, breakdown) = similarity(weights, target, &candidate);
            (score >= threshold).then_some((score, candidate, breakdown))
        })
        .collect();

    // Order on the raw score; rounding is for display only
    scored.sort_by(|(a_score, a, _), (b_score, b, _)| {
        b_score
            .partial_cmp(a_score)
            .unwrap_or(Ordering::Equal)
            .then(a.listing_id.cmp(&b.listing_id))
    });
    scored.truncate(max_results);
    scored
        .into_iter()
        .map(|(score, listing, breakdown)| Recommendation {
            listing,
            similarity_score: (score * 1000.0).round() / 1000.0,
            breakdown,
        })
        .collect()
}

const FEATURES_SELECT: &str = "
    SELECT
      l.listing_id,
      l.name,
      l.price,
      l.room_type,
      l.accommodates,
      n.name AS neighbourhood,
      COALESCE(n.latitude, ST_Y(l.geopoint::geometry)) AS latitude,
      COALESCE(n.longitude, ST_X(l.geopoint::geometry)) AS longitude,
      AVG(r.rating)::FLOAT8 AS avg_rating
    FROM Listing l
    LEFT JOIN Neighbourhood n ON n.listing_id = l.listing_id
    LEFT JOIN Review r ON r.listing_id = l.listing_id";

const FEATURES_GROUP_BY: &str = "
    GROUP BY l.listing_id, l.name, l.price, l.room_type, l.accommodates,
             n.name, n.latitude, n.longitude";

pub struct RecommendationEngine {
    weights: RwLock<SimilarityWeights>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(SimilarityWeights::default())
    }
}

impl RecommendationEngine {
    pub fn new(weights: SimilarityWeights) -> Self {
        RecommendationEngine {
            weights: RwLock::new(weights),
        }
    }

    pub async fn weights(&self) -> SimilarityWeights {
        *self.weights.read().await
    }

    /// Applies the update only if the resulting weights are valid.
    pub async fn update_weights(&self, update: &WeightsUpdate) -> Option<SimilarityWeights> {
        let mut weights = self.weights.write().await;
        let next = update.apply_to(*weights);
        if !next.is_valid() {
            return None;
        }
        *weights = next;
        info!("Similarity weights updated: {:?}", next);
        Some(next)
    }

    pub async fn search_listings(
        &self,
        pool: &PgPool,
        query: &str,
        limit: i64,
    ) -> Result<Vec<ListingMatch>, sqlx::Error> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ListingMatch>(
            "SELECT l.listing_id, l.name, l.price, l.room_type, n.name AS neighbourhood
             FROM Listing l
             LEFT JOIN Neighbourhood n ON n.listing_id = l.listing_id
             WHERE l.name ILIKE $1 OR n.name ILIKE $1
             ORDER BY l.name, l.listing_id
             LIMIT $2",
        )
        .bind(format!("%{}%", query))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn get_listing_recommendations(
        &self,
        pool: &PgPool,
        listing_id: i32,
        max_results: usize,
        threshold: f64,
    ) -> Result<Vec<Recommendation>, sqlx::Error> {
        let target = sqlx::query_as::<_, ListingFeatures>(&format!(
            "{} WHERE l.listing_id = $1 {}",
            FEATURES_SELECT, FEATURES_GROUP_BY
        ))
        .bind(listing_id)
        .fetch_optional(pool)
        .await?;

        let target = match target {
            Some(target) => target,
            None => return Ok(Vec::new()),
        };

        let candidates = sqlx::query_as::<_, ListingFeatures>(&format!(
            "{} WHERE l.listing_id <> $1 {}",
            FEATURES_SELECT, FEATURES_GROUP_BY
        ))
        .bind(listing_id)
        .fetch_all(pool)
        .await?;

        let weights = self.weights().await;
        Ok(rank(&weights, &target, candidates, max_results, threshold))
    }

    pub async fn get_listing_details_for_comparison(
        &self,
        pool: &PgPool,
        listing_id: i32,
    ) -> Result<Option<ListingComparison>, sqlx::Error> {
        let listing = sqlx::query_as::<_, ListingDetail>(
            "SELECT
               l.listing_id, l.name, l.description, l.room_type, l.accommodates,
               l.bedrooms, l.beds, l.bathrooms, l.price, l.minimum_nights,
               l.maximum_nights, l.instant_bookable, l.host_id,
               h.host_name, h.is_superhost,
               n.name AS neighbourhood, n.neighbourhood_group, n.latitude, n.longitude,
               AVG(r.rating)::FLOAT8 AS avg_rating,
               COUNT(r.review_id) AS review_count
             FROM Listing l
             JOIN Host h ON h.host_id = l.host_id
             LEFT JOIN Neighbourhood n ON n.listing_id = l.listing_id
             LEFT JOIN Review r ON r.listing_id = l.listing_id
             WHERE l.listing_id = $1
             GROUP BY l.listing_id, h.host_name, h.is_superhost,
                      n.name, n.neighbourhood_group, n.latitude, n.longitude",
        )
        .bind(listing_id)
        .fetch_optional(pool)
        .await?;

        let listing = match listing {
            Some(listing) => listing,
            None => return Ok(None),
        };

        let amenities = sqlx::query_scalar::<_, String>(
            "SELECT amenity FROM ListingAmenity WHERE listing_id = $1 ORDER BY amenity",
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await?;

        Ok(Some(ListingComparison { listing, amenities }))
    }
}
