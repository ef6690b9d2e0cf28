use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, JwtAuth, JwtClaims, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    extract_bearer_token, jwt_auth_middleware, require_admin,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;
use validator::Validate;

use crate::error::AutomatorResult;
use crate::models::{
    BatchResult, BulkCreateRequest, CatalogEntry, CatalogSettings, Envelope, MAX_BATCH_SIZE,
    ProductStatus, UpdateSettings,
};
use crate::service::ImageProductService;

pub const TAG: &str = "catalog";

const UNAUTHORIZED: &str = "Unauthorized";

#[derive(OpenApi)]
#[openapi(
    paths(bulk_create, get_settings, update_settings, get_entry),
    components(
        schemas(
            BulkCreateRequest,
            BatchResult,
            CatalogEntry,
            CatalogSettings,
            UpdateSettings,
            ProductStatus
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Create catalog entries from uploaded images")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct CatalogState {
    service: Arc<ImageProductService>,
    auth: JwtAuth,
}

/// `/bulk` authenticates from the request body; every other route requires an
/// admin bearer token.
pub fn router(service: ImageProductService, auth: JwtAuth) -> Router {
    let state = CatalogState {
        service: Arc::new(service),
        auth,
    };

    let admin = Router::new()
        .route("/settings", get(get_settings).put(update_settings))
        .route("/entries/{id}", get(get_entry))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .route("/bulk", post(bulk_create))
        .merge(admin)
        .with_state(state)
}

fn envelope_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(Envelope::error(message.into()))).into_response()
}

/// Admin claims from the body token, or the bearer header when the body has none.
fn authorize(
    auth: &JwtAuth,
    body_token: &str,
    headers: &HeaderMap,
) -> Result<JwtClaims, (StatusCode, Option<String>)> {
    let token = match body_token.trim() {
        "" => extract_bearer_token(headers),
        token => Some(token),
    }
    .ok_or((StatusCode::UNAUTHORIZED, None))?;

    let claims = auth.verify_token(token).map_err(|e| {
        tracing::debug!("Bulk request token rejected: {}", e);
        (StatusCode::UNAUTHORIZED, None)
    })?;

    if !claims.is_admin() {
        return Err((StatusCode::FORBIDDEN, Some(claims.sub)));
    }
    Ok(claims)
}

/// Create one catalog entry per image
///
/// Always answers `{ "success": bool, "data": ... }`. Per-image failures are
/// reported inside `data` and never fail the request.
#[utoipa::path(
    post,
    path = "/bulk",
    tag = TAG,
    request_body = BulkCreateRequest,
    responses(
        (status = 200, description = "Per-image results in input order", body = Envelope<Vec<BatchResult>>),
        (status = 400, description = "Malformed body or too many ids", body = Envelope<String>),
        (status = 401, description = "Missing, invalid or expired token", body = Envelope<String>),
        (status = 403, description = "Token lacks the admin role", body = Envelope<String>)
    )
)]
async fn bulk_create(
    State(state): State<CatalogState>,
    headers: HeaderMap,
    payload: Result<Json<BulkCreateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return envelope_error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let claims = match authorize(&state.auth, &request.auth_token, &headers) {
        Ok(claims) => claims,
        Err((status, user_id)) => {
            AuditEvent::new(user_id, "catalog.bulk_create", None, AuditOutcome::Denied)
                .with_request_headers(&headers)
                .with_details(json!({ "requested": request.image_ids.len() }))
                .log();
            return envelope_error(status, UNAUTHORIZED);
        }
    };

    if request.validate().is_err() {
        return envelope_error(
            StatusCode::BAD_REQUEST,
            format!("image_ids: at most {} ids per request", MAX_BATCH_SIZE),
        );
    }

    let results = state.service.bulk_create(&request.image_ids).await;
    let created = results.iter().filter(|r| r.success).count();

    let outcome = if created == results.len() {
        AuditOutcome::Success
    } else {
        AuditOutcome::Failure
    };
    AuditEvent::new(Some(claims.sub), "catalog.bulk_create", None, outcome)
        .with_request_headers(&headers)
        .with_details(json!({
            "requested": results.len(),
            "created": created,
            "failed": results.len() - created,
        }))
        .log();

    (StatusCode::OK, Json(Envelope::ok(results))).into_response()
}

/// Current catalog settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = TAG,
    responses(
        (status = 200, description = "Current settings", body = CatalogSettings),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_settings(State(state): State<CatalogState>) -> AutomatorResult<Json<CatalogSettings>> {
    let settings = state.service.get_settings().await?;
    Ok(Json(settings))
}

/// Update catalog settings
///
/// Omitted fields keep their value. The last issued sequence number cannot be
/// changed here.
#[utoipa::path(
    put,
    path = "/settings",
    tag = TAG,
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings updated", body = CatalogSettings),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_settings(
    State(state): State<CatalogState>,
    claims: JwtClaims,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<UpdateSettings>,
) -> AutomatorResult<Json<CatalogSettings>> {
    let settings = state.service.update_settings(input).await?;

    AuditEvent::new(
        Some(claims.sub),
        "catalog.settings_update",
        Some("catalog_settings".to_string()),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(&settings)
    .log();

    Ok(Json(settings))
}

/// Get a created catalog entry
#[utoipa::path(
    get,
    path = "/entries/{id}",
    tag = TAG,
    params(
        ("id" = uuid::Uuid, Path, description = "Catalog entry ID")
    ),
    responses(
        (status = 200, description = "Entry found", body = CatalogEntry),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_entry(
    State(state): State<CatalogState>,
    UuidPath(id): UuidPath,
) -> AutomatorResult<Json<CatalogEntry>> {
    let entry = state.service.get_entry(id).await?;
    Ok(Json(entry))
}
