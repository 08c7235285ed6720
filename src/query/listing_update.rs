use sqlx::{Postgres, QueryBuilder};

use super::non_blank;
use crate::routes::listings::listings_models::UpdateListingRequest;

fn text(value: &Option<String>) -> Option<String> {
    non_blank(value).map(str::to_string)
}

/// `UPDATE Listing` for the supplied, non-blank fields; `None` when there is nothing to set.
pub fn build_listing_update(req: &UpdateListingRequest) -> Option<QueryBuilder<'static, Postgres>> {
    let mut qb = QueryBuilder::new("UPDATE Listing SET ");
    let mut fields = 0;
    {
        let mut set = qb.separated(", ");
        if let Some(name) = text(&req.name) {
            set.push("name = ").push_bind_unseparated(name);
            fields += 1;
        }
        if let Some(description) = text(&req.description) {
            set.push("description = ").push_bind_unseparated(description);
            fields += 1;
        }
        if let Some(overview) = text(&req.neighbourhood_overview) {
            set.push("neighbourhood_overview = ").push_bind_unseparated(overview);
            fields += 1;
        }
        if let Some(room_type) = text(&req.room_type) {
            set.push("room_type = ").push_bind_unseparated(room_type);
            fields += 1;
        }
        if let Some(accommodates) = req.accommodates {
            set.push("accommodates = ").push_bind_unseparated(accommodates);
            fields += 1;
        }
        if let Some(bathrooms) = req.bathrooms {
            set.push("bathrooms = ").push_bind_unseparated(bathrooms);
            fields += 1;
        }
        if let Some(bedrooms) = req.bedrooms {
            set.push("bedrooms = ").push_bind_unseparated(bedrooms);
            fields += 1;
        }
        if let Some(price) = req.price {
            set.push("price = ").push_bind_unseparated(price);
            fields += 1;
        }
        if let Some(minimum_nights) = req.minimum_nights {
            set.push("minimum_nights = ").push_bind_unseparated(minimum_nights);
            fields += 1;
        }
    }
    if fields == 0 {
        return None;
    }
    qb.push(" WHERE listing_id = ").push_bind(req.listing_id);
    Some(qb)
}

pub fn build_neighbourhood_update(req: &UpdateListingRequest) -> Option<QueryBuilder<'static, Postgres>> {
    let mut qb = QueryBuilder::new("UPDATE Neighbourhood SET ");
    let mut fields = 0;
    {
        let mut set = qb.separated(", ");
        if let Some(name) = text(&req.neighbourhood_name) {
            set.push("name = ").push_bind_unseparated(name);
            fields += 1;
        }
        if let Some(group) = text(&req.neighbourhood_group) {
            set.push("neighbourhood_group = ").push_bind_unseparated(group);
            fields += 1;
        }
        if let Some(latitude) = req.latitude {
            set.push("latitude = ").push_bind_unseparated(latitude);
            fields += 1;
        }
        if let Some(longitude) = req.longitude {
            set.push("longitude = ").push_bind_unseparated(longitude);
            fields += 1;
        }
    }
    if fields == 0 {
        return None;
    }
    qb.push(" WHERE listing_id = ").push_bind(req.listing_id);
    Some(qb)
}
