pub mod analytics;
pub mod recommendation_engine;
pub mod referral_network;
