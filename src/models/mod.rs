// src/models/mod.rs

pub mod host;
pub mod listing;
pub mod notification;
pub mod referral;
