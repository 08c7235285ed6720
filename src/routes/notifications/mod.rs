pub mod notifications_handlers;
pub mod notifications_models;
