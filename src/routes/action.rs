use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;

use crate::error::AppError;

// Envelope for every state-changing route
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> HttpResponse {
        HttpResponse::Ok().json(ActionResponse {
            success: true,
            message: message.into(),
        })
    }

    pub fn failed(err: AppError) -> HttpResponse {
        let message = match &err {
            AppError::Database(e) => {
                error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            AppError::Config(_) | AppError::Io(_) => {
                error!("Unexpected error: {}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(err.status_code()).json(ActionResponse {
            success: false,
            message,
        })
    }
}
