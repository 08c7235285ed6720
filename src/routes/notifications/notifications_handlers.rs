use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use sqlx::PgPool;

use super::notifications_models::{MarkReadRequest, NotificationsResponse};
use crate::error::AppError;
use crate::models::host::HostSummary;
use crate::models::notification::{Notification, NotificationRow};
use crate::query::notification_filter::NotificationParams;
use crate::routes::action::ActionResponse;

pub async fn view_notifications(
    pool: web::Data<PgPool>,
    params: web::Query<NotificationParams>,
) -> Result<HttpResponse, AppError> {
    let params = params.into_inner();
    let page = params.page();
    info!("Received request to view notifications, page {}", page.page);

    let mut page_query = params.build_page_query();
    let notifications = page_query
        .build_query_as::<NotificationRow>()
        .fetch_all(pool.get_ref())
        .await?
        .into_iter()
        .map(Notification::from)
        .collect();

    let mut count_query = params.build_count_query();
    let total_count: i64 = count_query
        .build_query_scalar::<i64>()
        .fetch_one(pool.get_ref())
        .await?;

    let hosts = sqlx::query_as::<_, HostSummary>(
        "SELECT host_id, host_name FROM Host ORDER BY host_name",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(NotificationsResponse {
        notifications,
        hosts,
        current_filters: params.current_filters(),
        page: page.page,
        total_pages: page.total_pages(total_count),
        total_count,
        prev_page: page.prev_page(),
        next_page: page.next_page(total_count),
    }))
}

pub async fn mark_notification_read(
    pool: web::Data<PgPool>,
    req: web::Json<MarkReadRequest>,
) -> impl Responder {
    let notification_id = req.notification_id;
    info!("Received request to mark notification {} read", notification_id);

    let result = sqlx::query("UPDATE HostNotifications SET is_read = true WHERE notification_id = $1")
        .bind(notification_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => ActionResponse::failed(AppError::NotFound(format!(
            "Notification {} not found.",
            notification_id
        ))),
        Ok(_) => ActionResponse::ok("Notification marked as read"),
        Err(e) => {
            error!("Failed to mark notification {} read: {}", notification_id, e);
            ActionResponse::failed(AppError::Database(e))
        }
    }
}
