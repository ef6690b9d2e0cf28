//! UUID path parameter extractor.

use crate::errors::{AppError, ErrorCode, error_response};
use axum::{
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Single UUID path parameter; invalid values yield a 400 `INVALID_UUID` body.
///
/// ```ignore
/// async fn get_entry(UuidPath(id): UuidPath) -> String {
///     format!("Entry {}", id)
/// }
///
/// let app = Router::new().route("/entries/{id}", get(get_entry));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()).into_response())?;

        Uuid::parse_str(&raw).map(UuidPath).map_err(|_| {
            error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid UUID: {}", raw),
                ErrorCode::InvalidUuid,
            )
        })
    }
}
