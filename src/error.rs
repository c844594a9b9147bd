use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepoError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

pub type DepoResult<T> = Result<T, DepoError>;

impl IntoResponse for DepoError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            DepoError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            DepoError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            DepoError::Duplicate(msg) => (StatusCode::CONFLICT, msg),
            DepoError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            DepoError::Internal(msg) => {
                tracing::error!("Internal Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            DepoError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt Error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
