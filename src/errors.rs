use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::QueryRejection as MultiQueryRejection;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The request deadline elapsed before the store answered.
    #[error("Request deadline exceeded")]
    Timeout,

    /// Cache store failure. The raw message reaches the client.
    #[error("{0}")]
    Cache(String),

    #[error("{0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Store, decode or serialization failure, as opposed to an absent record
    /// or a bad request.
    pub fn is_execution(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Timeout
                | AppError::Cache(_)
                | AppError::Serialization(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            AppError::Database(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Timeout => {
                tracing::error!("Request deadline exceeded");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Request deadline exceeded".to_string(),
                )
            }
            AppError::Cache(message) => {
                tracing::error!("Cache error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            AppError::Serialization(err) => {
                tracing::error!("Serialization error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Cache(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let msg = error.message.as_ref().map_or_else(
                    || format!("{} is invalid", field),
                    |m| m.to_string(),
                );
                messages.push(msg);
            }
        }
        AppError::Validation(messages.join("; "))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!("Rejected path parameter: {}", rejection.body_text());
        AppError::Validation("Invalid product ID".to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultiQueryRejection> for AppError {
    fn from(rejection: MultiQueryRejection) -> Self {
        AppError::Validation(rejection.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("Product not found"), StatusCode::NOT_FOUND),
            (
                AppError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Timeout, StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::Cache("connection refused".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_classification() {
        assert!(AppError::NotFound("Shopping cart not found").is_not_found());
        assert!(!AppError::NotFound("Shopping cart not found").is_execution());
        assert!(AppError::Database(sqlx::Error::RowNotFound).is_execution());
        assert!(AppError::Cache("timeout".into()).is_execution());
        assert!(AppError::Timeout.is_execution());
        assert!(!AppError::Validation("x".into()).is_execution());
    }
}
