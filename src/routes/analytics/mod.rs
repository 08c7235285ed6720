pub mod analytics_handlers;
