use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::RequestContext;
use crate::state::AppState;

/// Extractor giving a handler the `RequestContext` of the current request.
///
/// Assumes the authenticator middleware already inserted the context into the
/// extensions. Missing means the route was wired without authentication → 401.
pub struct Authenticated(pub RequestContext);

impl FromRequestParts<AppState> for Authenticated
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(Authenticated)
            .ok_or(AppError::Unauthorized)
    }
}
