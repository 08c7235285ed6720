pub mod recommendations_handlers;
pub mod recommendations_models;
