use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;

use crate::repository::RepositoryError;

/// Failures surfaced by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Task with ID {0} not found.")]
    NotFound(i64),
    #[error("task store failure: {0}")]
    Repository(#[from] RepositoryError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::NotFound(_) => HttpResponse::NotFound().body(self.to_string()),
            ApiError::Repository(e) => {
                error!("Error accessing task store: {}", e);
                HttpResponse::InternalServerError().body("Error accessing task store")
            }
        }
    }
}
