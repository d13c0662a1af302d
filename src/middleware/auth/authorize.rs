//! Role guard middleware: re-read the caller's role and check it against the route's allow-list.
//!
//! Must sit inside `authenticate::apply`. Running without a `RequestContext` is a wiring bug:
//! debug builds panic, release builds answer 500.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{self, AllowedRoles, AuthError, RequestContext};
use crate::state::AppState;

#[derive(Clone)]
struct RoleGuard {
    state: AppState,
    allowed: AllowedRoles,
}

/// Gate every route of `router` on `allowed` (`AllowedRoles::any()` = any authenticated role).
///
/// Uses `route_layer`, so unmatched paths still fall through to 404 instead of being guarded.
pub fn apply(router: Router<AppState>, state: AppState, allowed: AllowedRoles) -> Router<AppState> {
    let guard = RoleGuard { state, allowed };
    router.route_layer(middleware::from_fn_with_state(guard, authorize_middleware))
}

async fn authorize_middleware(
    State(guard): State<RoleGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let outcome = auth::authorize(
        guard.state.profiles.as_ref(),
        req.extensions_mut().get_mut::<RequestContext>(),
        &guard.allowed,
    )
    .await;

    match outcome {
        Ok(_) => Ok(next.run(req).await),
        Err(AuthError::OrderingError) => {
            tracing::error!(path = %req.uri().path(), "role guard installed without authentication");
            debug_assert!(false, "role guard ran before the authenticator");
            Err(guard.state.reject(AuthError::OrderingError))
        }
        Err(err) => Err(guard.state.reject(err)),
    }
}
