//! Shared application state handed to routers at startup.

use axum_helpers::JwtAuth;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    pub jwt_auth: JwtAuth,
}
