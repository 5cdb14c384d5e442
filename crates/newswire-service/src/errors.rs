use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::upstream::ProviderError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API key is not configured")]
    Configuration,

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Failed to fetch news: {0}")]
    Internal(String),
}

impl From<crate::validation::ValidationError> for ApiError {
    fn from(err: crate::validation::ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingApiKey => ApiError::Configuration,
            ProviderError::Upstream { status, message } => ApiError::Upstream { status, message },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration | ApiError::DatabaseError(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Configuration => {
                error!("News provider API key is missing");
                json!({ "success": false, "error": self.to_string() })
            }
            ApiError::Upstream { ref message, .. } => {
                json!({ "success": false, "error": message })
            }
            ApiError::BadRequest(ref message) => {
                json!({ "success": false, "error": message })
            }
            ApiError::DatabaseError(ref err) => {
                error!(error = %err, "Database error occurred");
                json!({ "success": false, "error": "Database error", "message": err.to_string() })
            }
            ApiError::Internal(ref message) => {
                error!(error = %message, "Request failed");
                json!({ "success": false, "error": "Failed to fetch news", "message": message })
            }
        };

        (status, Json(body)).into_response()
    }
}
