pub mod action;
pub mod admin;
pub mod analytics;
pub mod hosts;
pub mod listings;
pub mod notifications;
pub mod recommendations;
pub mod routes;
