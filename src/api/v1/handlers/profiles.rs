/*
 * Responsibility
 * - /profile (own record) and /profiles (by id, admin listing, role changes)
 * - Role gating is done by the route guards; the ownership check happens here because
 *   only the handler knows which record is being touched
 */
use axum::{Json, extract::State};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::profiles::{ListProfilesQuery, ProfileResponse, SetRoleRequest, UpdateProfileRequest},
        extractors::{ApiJson, ApiPath, ApiQuery, Authenticated},
    },
    error::AppError,
    services::auth::ensure_owner_or_admin,
    state::AppState,
};

pub async fn get_own_profile(Authenticated(ctx): Authenticated) -> Json<ProfileResponse> {
    Json(ctx.into_profile().into())
}

pub async fn update_own_profile(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let update = req.into_update().map_err(AppError::bad_request)?;

    let profile = state
        .profiles
        .update_profile(ctx.user_id(), update)
        .await
        .map_err(|err| state.internal(err))?
        .ok_or(AppError::not_found("profile"))?;

    Ok(Json(profile.into()))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    ApiPath(profile_id): ApiPath<Uuid>,
) -> Result<Json<ProfileResponse>, AppError> {
    ensure_owner_or_admin(&ctx, profile_id).map_err(|err| state.reject(err))?;

    if profile_id == ctx.user_id() {
        return Ok(Json(ctx.into_profile().into()));
    }

    let profile = state
        .profiles
        .get_profile(profile_id)
        .await
        .map_err(|err| state.internal(err))?
        .ok_or(AppError::not_found("profile"))?;

    Ok(Json(profile.into()))
}

pub async fn list_profiles(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListProfilesQuery>,
) -> Result<Json<Vec<ProfileResponse>>, AppError> {
    let (limit, offset) = query.page().map_err(AppError::bad_request)?;

    let profiles = state
        .profiles
        .list_profiles(limit, offset)
        .await
        .map_err(|err| state.internal(err))?;

    Ok(Json(profiles.into_iter().map(ProfileResponse::from).collect()))
}

pub async fn set_role(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    ApiPath(profile_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<SetRoleRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .profiles
        .set_role(profile_id, req.role)
        .await
        .map_err(|err| state.internal(err))?
        .ok_or(AppError::not_found("profile"))?;

    tracing::info!(
        admin_id = %ctx.user_id(),
        user_id = %profile.id,
        role = %profile.role,
        "role changed"
    );

    Ok(Json(profile.into()))
}
