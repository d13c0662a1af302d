/*
 * Responsibility
 * - v1 URL layout
 * - Which routes are public, which need authentication, and which roles each guarded group admits
 *
 * Layering: role guards are applied per group first (route_layer), then the authenticator
 * wraps the merged protected router, so every request sees authenticate → authorize → handler.
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::api::v1::handlers::{
    auth::{login, logout, refresh, signup},
    health::health,
    profiles::{get_own_profile, get_profile, list_profiles, set_role, update_own_profile},
};
use crate::middleware::auth::{authenticate, authorize};
use crate::services::auth::AllowedRoles;
use crate::services::profiles::Role;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh));

    // Any authenticated role.
    let members = authorize::apply(
        Router::new()
            .route("/auth/logout", post(logout))
            .route("/profile", get(get_own_profile).patch(update_own_profile))
            .route("/profiles/{profile_id}", get(get_profile)),
        state.clone(),
        AllowedRoles::any(),
    );

    let admins = authorize::apply(
        Router::new()
            .route("/profiles", get(list_profiles))
            .route("/profiles/{profile_id}/role", put(set_role)),
        state.clone(),
        AllowedRoles::only([Role::Admin]),
    );

    let protected = authenticate::apply(members.merge(admins), state);

    public.merge(protected)
}
