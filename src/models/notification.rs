use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub notification_id: i32,
    pub host_name: String,
    pub notification_type: String,
    pub message: String,
    pub related_listing_name: Option<String>,
    pub related_listing_price: Option<f64>,
    pub neighbourhood: Option<String>,
    pub created_at: NaiveDateTime,
    pub is_read: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub notification_id: i32,
    pub host_name: String,
    pub notification_type: String,
    pub message: String,
    pub related_listing_name: Option<String>,
    pub related_listing_price: Option<f64>,
    pub neighbourhood: Option<String>,
    pub created_at: NaiveDateTime,
    pub is_read: bool,
    pub status: &'static str,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            status: if row.is_read { "Read" } else { "Unread" },
            notification_id: row.notification_id,
            host_name: row.host_name,
            notification_type: row.notification_type,
            message: row.message,
            related_listing_name: row.related_listing_name,
            related_listing_price: row.related_listing_price,
            neighbourhood: row.neighbourhood,
            created_at: row.created_at,
            is_read: row.is_read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn status_label_follows_read_flag() {
        let created_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let row = NotificationRow {
            notification_id: 1,
            host_name: "Maria Lopez".into(),
            notification_type: "price_change".into(),
            message: "Price changed".into(),
            related_listing_name: None,
            related_listing_price: None,
            neighbourhood: None,
            created_at,
            is_read: false,
        };
        assert_eq!(Notification::from(row.clone()).status, "Unread");

        let read = NotificationRow { is_read: true, ..row };
        assert_eq!(Notification::from(read).status, "Read");
    }
}
