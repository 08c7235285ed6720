use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use sqlx::{Postgres, QueryBuilder};

pub mod listing_search;
pub mod listing_update;
pub mod notification_filter;
pub mod pagination;

/// Lenient form/query field: a missing, blank or unparsable value becomes `None`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            trimmed.parse::<T>().ok()
        }
    }))
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// Opens the first filter with WHERE and chains the rest with AND
pub(crate) fn begin_clause(qb: &mut QueryBuilder<'_, Postgres>, clauses: &mut usize) {
    qb.push(if *clauses == 0 { " WHERE " } else { " AND " });
    *clauses += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "lenient")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "lenient")]
        page: Option<i64>,
    }

    #[test]
    fn blank_and_invalid_values_become_none() {
        let p: Params = serde_urlencoded_from("price=&page=abc");
        assert_eq!(p.price, None);
        assert_eq!(p.page, None);
    }

    #[test]
    fn valid_values_are_parsed() {
        let p: Params = serde_urlencoded_from("price=120.5&page=3");
        assert_eq!(p.price, Some(120.5));
        assert_eq!(p.page, Some(3));
    }

    #[test]
    fn missing_values_default_to_none() {
        let p: Params = serde_urlencoded_from("");
        assert_eq!(p.price, None);
    }

    fn serde_urlencoded_from(qs: &str) -> Params {
        actix_web::web::Query::<Params>::from_query(qs)
            .unwrap()
            .into_inner()
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank(&Some("  ".into())), None);
        assert_eq!(non_blank(&Some(" Zilker ".into())), Some("Zilker"));
        assert_eq!(non_blank(&None), None);
    }
}
