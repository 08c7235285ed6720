use serde::{Deserialize, Serialize};

use crate::models::host::HostSummary;
use crate::models::listing::{HomeListing, ListingSummary};
use crate::query::listing_search::CurrentFilters;

#[derive(Serialize)]
pub struct HomeResponse {
    pub top_listings: Vec<HomeListing>,
}

#[derive(Serialize)]
pub struct ViewListingsResponse {
    pub listings: Vec<ListingSummary>,
    pub neighbourhoods: Vec<String>,
    pub room_types: Vec<String>,
    pub current_filters: CurrentFilters,
    pub page: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

#[derive(Serialize)]
pub struct AddListingFormResponse {
    pub hosts: Vec<HostSummary>,
}

// Add listing request
#[derive(Debug, Deserialize)]
pub struct AddListingRequest {
    pub listing_id: i32,
    pub host_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub neighbourhood_overview: Option<String>,
    pub room_type: Option<String>,
    pub accommodates: Option<i32>,
    pub bathrooms: Option<f64>,
    pub bathrooms_text: Option<String>,
    pub bedrooms: Option<i32>,
    pub beds: Option<i32>,
    pub price: f64,
    pub minimum_nights: Option<i32>,
    pub maximum_nights: Option<i32>,
    #[serde(default)]
    pub instant_bookable: bool,
    pub neighbourhood_name: String,
    pub neighbourhood_group: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// Update listing request, every field but the id is optional
#[derive(Debug, Default, Deserialize)]
pub struct UpdateListingRequest {
    pub listing_id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub neighbourhood_overview: Option<String>,
    pub room_type: Option<String>,
    pub accommodates: Option<i32>,
    pub bathrooms: Option<f64>,
    pub bedrooms: Option<i32>,
    pub price: Option<f64>,
    pub minimum_nights: Option<i32>,
    pub neighbourhood_name: Option<String>,
    pub neighbourhood_group: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// Delete listing request
#[derive(Debug, Deserialize)]
pub struct DeleteListingRequest {
    pub listing_id: i32,
}

pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), String> {
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("Latitude {} is out of range", lat));
        }
    }
    if let Some(lng) = longitude {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!("Longitude {} is out of range", lng));
        }
    }
    Ok(())
}

impl AddListingRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Listing name is required".into());
        }
        if self.neighbourhood_name.trim().is_empty() {
            return Err("Neighbourhood name is required".into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Price must be a non-negative number".into());
        }
        if let (Some(min), Some(max)) = (self.minimum_nights, self.maximum_nights) {
            if min > max {
                return Err("Minimum nights cannot exceed maximum nights".into());
            }
        }
        validate_coordinates(self.latitude, self.longitude)
    }
}

impl UpdateListingRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err("Price must be a non-negative number".into());
            }
        }
        validate_coordinates(self.latitude, self.longitude)
    }

    // Geopoint moves only when both coordinates are supplied
    pub fn new_geopoint(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lng), Some(lat)) => Some((lng, lat)),
            _ => None,
        }
    }
}
