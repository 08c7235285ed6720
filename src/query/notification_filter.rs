use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use super::pagination::Page;
use super::{begin_clause, lenient, non_blank};

const NOTIFICATION_SELECT: &str = "
    SELECT
      hn.notification_id,
      h.host_name,
      hn.notification_type,
      hn.message,
      l.name AS related_listing_name,
      l.price AS related_listing_price,
      n.name AS neighbourhood,
      hn.created_at,
      hn.is_read
    FROM HostNotifications hn
    JOIN Host h ON hn.host_id = h.host_id
    LEFT JOIN Listing l ON hn.related_listing_id = l.listing_id
    LEFT JOIN Neighbourhood n ON l.listing_id = n.listing_id";

const NOTIFICATION_COUNT_SELECT: &str = "
    SELECT COUNT(*)
    FROM HostNotifications hn
    JOIN Host h ON hn.host_id = h.host_id
    LEFT JOIN Listing l ON hn.related_listing_id = l.listing_id
    LEFT JOIN Neighbourhood n ON l.listing_id = n.listing_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    Read,
    Unread,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NotificationParams {
    #[serde(default, deserialize_with = "lenient")]
    pub host_id: Option<i32>,
    pub notification_type: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<i64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct NotificationFilters {
    pub host_id: Option<i32>,
    pub notification_type: Option<String>,
    pub status: Option<String>,
}

impl NotificationParams {
    pub fn page(&self) -> Page {
        Page::new(self.page)
    }

    // Unrecognised status values do not filter
    pub fn read_status(&self) -> Option<ReadStatus> {
        match non_blank(&self.status) {
            Some("read") => Some(ReadStatus::Read),
            Some("unread") => Some(ReadStatus::Unread),
            _ => None,
        }
    }

    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut clauses = 0;

        if let Some(host_id) = self.host_id {
            begin_clause(qb, &mut clauses);
            qb.push("hn.host_id = ").push_bind(host_id);
        }
        if let Some(notification_type) = non_blank(&self.notification_type) {
            begin_clause(qb, &mut clauses);
            qb.push("hn.notification_type = ")
                .push_bind(notification_type.to_string());
        }
        match self.read_status() {
            Some(ReadStatus::Read) => {
                begin_clause(qb, &mut clauses);
                qb.push("hn.is_read = true");
            }
            Some(ReadStatus::Unread) => {
                begin_clause(qb, &mut clauses);
                qb.push("hn.is_read = false");
            }
            None => {}
        }
    }

    pub fn build_page_query(&self) -> QueryBuilder<'static, Postgres> {
        let page = self.page();
        let mut qb = QueryBuilder::new(NOTIFICATION_SELECT);
        self.push_where(&mut qb);
        qb.push(" ORDER BY hn.created_at DESC LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());
        qb
    }

    pub fn build_count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(NOTIFICATION_COUNT_SELECT);
        self.push_where(&mut qb);
        qb
    }

    pub fn current_filters(&self) -> NotificationFilters {
        NotificationFilters {
            host_id: self.host_id,
            notification_type: non_blank(&self.notification_type).map(str::to_string),
            status: non_blank(&self.status).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(qs: &str) -> NotificationParams {
        actix_web::web::Query::<NotificationParams>::from_query(qs)
            .unwrap()
            .into_inner()
    }

    #[test]
    fn unfiltered_list_is_newest_first() {
        let qb = params("").build_page_query();
        let sql = qb.sql();
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY hn.created_at DESC LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn status_filter_binds_no_parameter() {
        let qb = params("host_id=1001&status=unread&notification_type=price_change").build_page_query();
        let sql = qb.sql();
        assert!(sql.contains(
            " WHERE hn.host_id = $1 AND hn.notification_type = $2 AND hn.is_read = false"
        ));
        assert!(sql.contains("LIMIT $3 OFFSET $4"));
    }

    #[test]
    fn count_query_uses_same_filters_without_paging() {
        let p = params("status=read&host_id=7");
        let count = p.build_count_query();
        assert!(count.sql().contains(" WHERE hn.host_id = $1 AND hn.is_read = true"));
        assert!(!count.sql().contains("LIMIT"));
    }

    #[test]
    fn unknown_status_is_ignored() {
        assert_eq!(params("status=archived").read_status(), None);
        assert!(!params("status=archived").build_count_query().sql().contains("WHERE"));
    }

    #[test]
    fn filters_are_echoed() {
        let filters = params("host_id=3&status=read").current_filters();
        assert_eq!(
            filters,
            NotificationFilters {
                host_id: Some(3),
                notification_type: None,
                status: Some("read".into()),
            }
        );
    }
}
