//! Stateless JWT authentication.
//!
//! - Token verification against a shared HS256 secret
//! - Middleware that puts [`JwtClaims`] into request extensions
//! - Role gate for admin-only routes
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware, require_admin};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let admin = Router::new()
//!     .route("/settings", get(handler))
//!     .layer(axum::middleware::from_fn(require_admin))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, ADMIN_ROLE, JwtAuth, JwtClaims};
pub use middleware::{extract_bearer_token, jwt_auth_middleware, require_admin};
