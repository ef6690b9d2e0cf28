//! JSON extractor with `validator` checks.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that must also pass `Validate`.
///
/// Malformed bodies reject with `JSON_EXTRACTION`, failed validation with
/// `VALIDATION_ERROR` and per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct UpdateSettings {
///     #[validate(range(min = 1, max = 10))]
///     sequence_digits: Option<u8>,
/// }
///
/// async fn update(ValidatedJson(input): ValidatedJson<UpdateSettings>) { /* ... */ }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorResponse;
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Digits {
        #[validate(range(min = 1, max = 10))]
        width: u8,
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            post(|ValidatedJson(d): ValidatedJson<Digits>| async move { d.width.to_string() }),
        )
    }

    async fn send(body: &'static str) -> (StatusCode, Vec<u8>) {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let (status, body) = send(r#"{"width": 3}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"3");
    }

    #[tokio::test]
    async fn test_out_of_range_reports_field() {
        let (status, body) = send(r#"{"width": 11}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "VALIDATION_ERROR");
        assert!(error.details.unwrap().get("width").is_some());
    }

    #[tokio::test]
    async fn test_malformed_json_is_extraction_error() {
        let (status, body) = send(r#"{"width": "#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "JSON_EXTRACTION");
    }
}
