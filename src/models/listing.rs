use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HomeListing {
    pub listing_id: i32,
    pub name: String,
    pub price: f64,
    pub neighbourhood: String,
    pub min_nights: Option<i32>,
    pub avg_rating: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ListingSummary {
    pub listing_id: i32,
    pub name: String,
    pub price: f64,
    pub room_type: Option<String>,
    pub min_nights: Option<i32>,
    pub neighbourhood: String,
    pub avg_rating: Option<f64>,
    pub review_count: i64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl ListingSummary {
    pub fn rounded(mut self) -> Self {
        self.avg_rating = self.avg_rating.map(|r| (r * 100.0).round() / 100.0);
        self
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HostListing {
    pub listing_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub room_type: Option<String>,
    pub accommodates: Option<i32>,
    pub price: f64,
    pub minimum_nights: Option<i32>,
    pub maximum_nights: Option<i32>,
    pub instant_bookable: bool,
    pub created_date: NaiveDate,
    pub last_scraped: Option<NaiveDate>,
    pub neighbourhood_name: Option<String>,
    pub neighbourhood_group: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub avg_rating: f64,
    pub review_count: i64,
    pub total_reviews: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rating_is_rounded_to_two_places() {
        let summary = ListingSummary {
            listing_id: 1,
            name: "Loft".into(),
            price: 100.0,
            room_type: None,
            min_nights: Some(1),
            neighbourhood: "Downtown".into(),
            avg_rating: Some(4.666_666),
            review_count: 3,
            lat: None,
            lng: None,
        };
        assert_eq!(summary.rounded().avg_rating, Some(4.67));
    }
}
