pub mod hosts_handlers;
pub mod hosts_models;
