//! Authenticator middleware: bearer credential → `RequestContext` in the request extensions.
//!
//! Flow:
//! - extract the token (`Authorization: Bearer` first, then the session cookie)
//! - verify it with the identity service
//! - load the profile
//! - insert the context and run the next stage
//!
//! Any failure short-circuits with a JSON rejection; nothing is inserted in that case.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{self, AuthError, credential};
use crate::state::AppState;

/// Require authentication on every route of `router`.
///
/// Apply it AFTER any role guards (`authorize::apply`) so it wraps them and runs first:
/// ```ignore
/// let admin = authorize::apply(admin_routes, state.clone(), AllowedRoles::only([Role::Admin]));
/// let protected = authenticate::apply(admin, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn can't take a State extractor in axum 0.8, so pass the state explicitly
    router.layer(middleware::from_fn_with_state(state, authenticate_middleware))
}

async fn authenticate_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let credential = credential::extract(req.headers(), state.session_cookie_name());

    let ctx = match auth::authenticate(
        state.identity.as_ref(),
        state.profiles.as_ref(),
        credential,
    )
    .await
    {
        Ok(ctx) => ctx,
        Err(AuthError::NoCredential) => {
            tracing::debug!(path = %req.uri().path(), "request without credential");
            return Err(state.reject(AuthError::NoCredential));
        }
        Err(err) => {
            tracing::warn!(error = %err, path = %req.uri().path(), "authentication failed");
            return Err(state.reject(err));
        }
    };

    tracing::debug!(user_id = %ctx.user_id(), role = %ctx.role(), "authenticated");

    // middleware → extractor handoff
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
