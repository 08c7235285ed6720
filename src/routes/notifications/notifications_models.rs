use serde::{Deserialize, Serialize};

use crate::models::host::HostSummary;
use crate::models::notification::Notification;
use crate::query::notification_filter::NotificationFilters;

#[derive(Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub hosts: Vec<HostSummary>,
    pub current_filters: NotificationFilters,
    pub page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub prev_page: i64,
    pub next_page: i64,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub notification_id: i32,
}
