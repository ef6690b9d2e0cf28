use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AutomatorError {
    #[error("Attachment {0} is not an image")]
    NotAnImage(i64),

    #[error("Product already exists for this image")]
    AlreadyExists(i64),

    #[error("Failed to save product: {0}")]
    Persistence(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Catalog entry not found: {0}")]
    NotFound(Uuid),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AutomatorResult<T> = Result<T, AutomatorError>;

impl AutomatorError {
    /// Errors that belong to a single batch item rather than the whole request.
    pub fn is_item_error(&self) -> bool {
        matches!(
            self,
            AutomatorError::NotAnImage(_)
                | AutomatorError::AlreadyExists(_)
                | AutomatorError::Persistence(_)
        )
    }
}

impl From<AutomatorError> for AppError {
    fn from(err: AutomatorError) -> Self {
        match err {
            AutomatorError::NotAnImage(id) => {
                AppError::UnprocessableEntity(format!("Attachment {} is not an image", id))
            }
            AutomatorError::AlreadyExists(id) => {
                AppError::Conflict(format!("Product already exists for image {}", id))
            }
            AutomatorError::Persistence(msg) | AutomatorError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
            AutomatorError::Unauthorized(msg) => AppError::Unauthorized(msg),
            AutomatorError::Validation(msg) => AppError::BadRequest(msg),
            AutomatorError::NotFound(id) => {
                AppError::NotFound(format!("Catalog entry {} not found", id))
            }
        }
    }
}

impl IntoResponse for AutomatorError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_already_exists_message_is_stable() {
        assert_eq!(
            AutomatorError::AlreadyExists(5).to_string(),
            "Product already exists for this image"
        );
    }

    #[test]
    fn test_item_errors() {
        assert!(AutomatorError::NotAnImage(1).is_item_error());
        assert!(AutomatorError::Persistence("x".into()).is_item_error());
        assert!(!AutomatorError::Unauthorized("x".into()).is_item_error());
        assert!(!AutomatorError::Internal("x".into()).is_item_error());
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AutomatorError::NotFound(Uuid::nil()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
