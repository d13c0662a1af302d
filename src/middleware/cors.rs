//! CORS policy for browser clients.
//!
//! Policy:
//! - Development: any origin, WITHOUT credentials (bearer header only).
//! - Production: exact-match allowlist from `CORS_ALLOWED_ORIGINS`. Credentials are
//!   allowed only when the session-cookie fallback is enabled.
//! - An empty production allowlist allows no origin at all.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

pub fn apply(router: Router, config: &Config) -> Router {
    let cors = if config.app_env.is_production() {
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        });

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_credentials(config.session_cookie_name.is_some())
    } else {
        CorsLayer::new().allow_origin(Any)
    }
    .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static("x-request-id"),
    ])
    .expose_headers([HeaderName::from_static("x-request-id")])
    .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}
