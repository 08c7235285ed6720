pub mod listings_handlers;
pub mod listings_models;
