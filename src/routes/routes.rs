use actix_web::web;

use super::admin::admin_handlers;
use super::analytics::analytics_handlers;
use super::hosts::hosts_handlers;
use super::listings::listings_handlers;
use super::notifications::notifications_handlers;
use super::recommendations::recommendations_handlers;

pub fn listings_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(listings_handlers::home))
        .route("/view-listings", web::get().to(listings_handlers::view_listings))
        .route("/add-listing", web::get().to(listings_handlers::add_listing_form))
        .route("/add-listing", web::post().to(listings_handlers::add_listing))
        .route("/update-listing", web::post().to(listings_handlers::update_listing))
        .route("/delete-listing", web::post().to(listings_handlers::delete_listing));
}

pub fn admin_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/add-sample", web::get().to(admin_handlers::add_sample))
        .route("/delete-all", web::get().to(admin_handlers::delete_all));
}

pub fn notifications_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/notifications", web::get().to(notifications_handlers::view_notifications))
        .route(
            "/mark-notification-read",
            web::post().to(notifications_handlers::mark_notification_read),
        );
}

pub fn analytics_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/analytics", web::get().to(analytics_handlers::analytics_dashboard))
        .route("/refresh-analytics", web::get().to(analytics_handlers::refresh_analytics))
        .service(
            web::scope("/api/analytics")
                .route("", web::get().to(analytics_handlers::analytics_api))
                .route("/host-performance", web::get().to(analytics_handlers::host_performance_api))
                .route("/price-trends", web::get().to(analytics_handlers::price_trends_api))
                .route("/neighbourhood", web::get().to(analytics_handlers::neighbourhood_api)),
        );
}

pub fn hosts_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/referral-network", web::get().to(hosts_handlers::view_referral_network))
        .route("/add-host-referral", web::get().to(hosts_handlers::add_host_referral_form))
        .route("/add-host-referral", web::post().to(hosts_handlers::add_host_referral))
        .route(
            "/add-host-referral/{host_id}",
            web::get().to(hosts_handlers::edit_host_referral_form),
        )
        .route(
            "/add-host-referral/{host_id}",
            web::post().to(hosts_handlers::edit_host_referral),
        )
        .route("/host-details/{host_id}", web::get().to(hosts_handlers::host_details));
}

// Fixed paths are registered ahead of /{listing_id}
pub fn recommendations_configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/recommendations",
        web::get().to(recommendations_handlers::recommendations_index),
    )
    .service(
        web::scope("/api/recommendations")
            .route("/search", web::get().to(recommendations_handlers::search_listings))
            .route("/weights", web::get().to(recommendations_handlers::get_weights))
            .route("/weights", web::post().to(recommendations_handlers::update_weights))
            .route(
                "/listing/{listing_id}",
                web::get().to(recommendations_handlers::listing_details),
            )
            .route(
                "/{listing_id}",
                web::get().to(recommendations_handlers::listing_recommendations),
            ),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(listings_configure)
        .configure(admin_configure)
        .configure(notifications_configure)
        .configure(analytics_configure)
        .configure(hosts_configure)
        .configure(recommendations_configure);
}
