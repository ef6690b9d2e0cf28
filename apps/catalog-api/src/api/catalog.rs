use axum::Router;
use domain_image_products::{
    ImageProductService, PgCatalogRepository, PgMediaRepository, PgSettingsRepository, handlers,
};
use std::sync::Arc;

pub fn router(state: &crate::state::AppState) -> Router {
    let settings = Arc::new(PgSettingsRepository::new(state.db.clone()));
    let service = ImageProductService::new(
        Arc::new(PgCatalogRepository::new(state.db.clone())),
        Arc::new(PgMediaRepository::new(state.db.clone())),
        settings.clone(),
        settings,
    );
    handlers::router(service, state.jwt_auth.clone())
}
