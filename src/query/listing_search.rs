use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use super::pagination::Page;
use super::{begin_clause, lenient, non_blank};

const LISTING_SELECT: &str = "
    SELECT
      l.listing_id,
      l.name,
      l.price,
      l.room_type,
      l.minimum_nights AS min_nights,
      n.name AS neighbourhood,
      AVG(r.rating)::FLOAT8 AS avg_rating,
      COUNT(r.review_id) AS review_count,
      ST_Y(l.geopoint::geometry) AS lat,
      ST_X(l.geopoint::geometry) AS lng
    FROM Listing l
    JOIN Neighbourhood n ON n.listing_id = l.listing_id
    LEFT JOIN Review r ON r.listing_id = l.listing_id";

const LISTING_COUNT_SELECT: &str = "
    SELECT COUNT(*) FROM (
      SELECT l.listing_id
      FROM Listing l
      JOIN Neighbourhood n ON n.listing_id = l.listing_id
      LEFT JOIN Review r ON r.listing_id = l.listing_id";

const LISTING_GROUP_BY: &str = "
    GROUP BY l.listing_id, l.name, l.price, l.room_type, n.name";

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListingSearchParams {
    pub search: Option<String>,
    pub neighbourhood: Option<String>,
    pub room_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_max: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub min_nights: Option<i32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub radius_km: Option<f64>,
    pub preset_place: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Price,
    Name,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

// Echoed back so the client can keep its filter form populated
#[derive(Debug, Serialize, PartialEq)]
pub struct CurrentFilters {
    pub search: String,
    pub neighbourhood: String,
    pub room_type: String,
    pub price_min: String,
    pub price_max: String,
    pub min_nights: String,
    pub sort_by: String,
    pub sort_order: String,
    pub lat: String,
    pub lng: String,
    pub radius_km: String,
    pub preset_place: String,
}

impl ListingSearchParams {
    pub fn page(&self) -> Page {
        Page::new(self.page)
    }

    pub fn sort(&self) -> (SortKey, SortOrder) {
        let order = match non_blank(&self.sort_order) {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };
        match non_blank(&self.sort_by) {
            Some("price") => (SortKey::Price, order),
            Some("name") => (SortKey::Name, order),
            _ => (SortKey::Rating, SortOrder::Desc),
        }
    }

    /// Geo filter point and radius in metres; only when all three inputs are given.
    pub fn geo_filter(&self) -> Option<(f64, f64, f64)> {
        match (self.lng, self.lat, self.radius_km) {
            (Some(lng), Some(lat), Some(radius_km)) => Some((lng, lat, radius_km * 1000.0)),
            _ => None,
        }
    }

    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut clauses = 0;

        if let Some(search) = non_blank(&self.search) {
            let wildcard = format!("%{}%", search);
            begin_clause(qb, &mut clauses);
            qb.push("(l.name ILIKE ")
                .push_bind(wildcard.clone())
                .push(" OR n.name ILIKE ")
                .push_bind(wildcard)
                .push(")");
        }
        if let Some(neighbourhood) = non_blank(&self.neighbourhood) {
            begin_clause(qb, &mut clauses);
            qb.push("n.name = ").push_bind(neighbourhood.to_string());
        }
        if let Some(room_type) = non_blank(&self.room_type) {
            begin_clause(qb, &mut clauses);
            qb.push("l.room_type = ").push_bind(room_type.to_string());
        }
        if let Some(price_min) = self.price_min {
            begin_clause(qb, &mut clauses);
            qb.push("l.price >= ").push_bind(price_min);
        }
        if let Some(price_max) = self.price_max {
            begin_clause(qb, &mut clauses);
            qb.push("l.price <= ").push_bind(price_max);
        }
        if let Some(min_nights) = self.min_nights {
            begin_clause(qb, &mut clauses);
            qb.push("l.minimum_nights >= ").push_bind(min_nights);
        }
        if let Some((lng, lat, radius_m)) = self.geo_filter() {
            begin_clause(qb, &mut clauses);
            qb.push("ST_DWithin(l.geopoint, ST_SetSRID(ST_MakePoint(")
                .push_bind(lng)
                .push(", ")
                .push_bind(lat)
                .push("), 4326)::geography, ")
                .push_bind(radius_m)
                .push(")");
        }
    }

    pub fn build_page_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(LISTING_SELECT);
        self.push_where(&mut qb);
        qb.push(LISTING_GROUP_BY);

        let (key, order) = self.sort();
        let direction = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        match key {
            SortKey::Price => qb.push(format!(" ORDER BY l.price {}", direction)),
            SortKey::Name => qb.push(format!(" ORDER BY l.name {}", direction)),
            SortKey::Rating => qb.push(" ORDER BY avg_rating DESC NULLS LAST, l.price ASC"),
        };

        let page = self.page();
        qb.push(" LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        qb
    }

    pub fn build_count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(LISTING_COUNT_SELECT);
        self.push_where(&mut qb);
        qb.push(LISTING_GROUP_BY);
        qb.push(") AS sub");
        qb
    }

    pub fn current_filters(&self) -> CurrentFilters {
        fn text(v: &Option<String>) -> String {
            v.clone().unwrap_or_default()
        }
        fn num<T: ToString>(v: Option<T>) -> String {
            v.map(|n| n.to_string()).unwrap_or_default()
        }
        CurrentFilters {
            search: text(&self.search),
            neighbourhood: text(&self.neighbourhood),
            room_type: text(&self.room_type),
            price_min: num(self.price_min),
            price_max: num(self.price_max),
            min_nights: num(self.min_nights),
            sort_by: text(&self.sort_by),
            sort_order: text(&self.sort_order),
            lat: num(self.lat),
            lng: num(self.lng),
            radius_km: num(self.radius_km),
            preset_place: text(&self.preset_place),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(qs: &str) -> ListingSearchParams {
        actix_web::web::Query::<ListingSearchParams>::from_query(qs)
            .unwrap()
            .into_inner()
    }

    #[test]
    fn no_filters_means_no_where_clause() {
        let qb = params("").build_page_query();
        let sql = qb.sql();
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY avg_rating DESC NULLS LAST, l.price ASC"));
        assert!(sql.trim_end().ends_with("LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn search_matches_name_or_neighbourhood() {
        let qb = params("search=park").build_page_query();
        assert!(qb.sql().contains(" WHERE (l.name ILIKE $1 OR n.name ILIKE $2)"));
    }

    #[test]
    fn filters_are_joined_with_and_in_order() {
        let qb = params("neighbourhood=Zilker&room_type=Private%20room&price_min=50&price_max=150&min_nights=2")
            .build_page_query();
        let sql = qb.sql();
        assert!(sql.contains(
            " WHERE n.name = $1 AND l.room_type = $2 AND l.price >= $3 AND l.price <= $4 AND l.minimum_nights >= $5"
        ));
        assert!(sql.contains("LIMIT $6 OFFSET $7"));
    }

    #[test]
    fn blank_filters_are_ignored() {
        let qb = params("search=&neighbourhood=&price_min=").build_page_query();
        assert!(!qb.sql().contains("WHERE"));
    }

    #[test]
    fn geo_filter_needs_all_three_inputs() {
        assert_eq!(params("lat=30.2&lng=-97.7").geo_filter(), None);
        assert_eq!(
            params("lat=30.2&lng=-97.7&radius_km=2.5").geo_filter(),
            Some((-97.7, 30.2, 2500.0))
        );
        let qb = params("lat=30.2&lng=-97.7&radius_km=2.5").build_page_query();
        assert!(qb
            .sql()
            .contains("ST_DWithin(l.geopoint, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography, $3)"));
    }

    #[test]
    fn sort_by_price_and_name() {
        assert_eq!(params("sort_by=price&sort_order=asc").sort(), (SortKey::Price, SortOrder::Asc));
        assert_eq!(params("sort_by=name").sort(), (SortKey::Name, SortOrder::Desc));
        assert!(params("sort_by=name&sort_order=asc")
            .build_page_query()
            .sql()
            .contains("ORDER BY l.name ASC"));
        assert_eq!(params("sort_by=rating&sort_order=asc").sort(), (SortKey::Rating, SortOrder::Desc));
    }

    #[test]
    fn count_query_shares_the_filters() {
        let p = params("room_type=Entire%20home%2Fapt&min_nights=3");
        let sql = p.build_count_query().sql().to_string();
        assert!(sql.contains(" WHERE l.room_type = $1 AND l.minimum_nights >= $2"));
        assert!(sql.trim_end().ends_with(") AS sub"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn current_filters_echo_with_blanks() {
        let filters = params("search=loft&price_max=200&page=2").current_filters();
        assert_eq!(filters.search, "loft");
        assert_eq!(filters.price_max, "200");
        assert_eq!(filters.price_min, "");
        assert_eq!(filters.preset_place, "");
    }

    #[test]
    fn page_offset_comes_from_params() {
        assert_eq!(params("page=2").page().offset(), 20);
        assert_eq!(params("page=-1").page().offset(), 0);
    }
}
