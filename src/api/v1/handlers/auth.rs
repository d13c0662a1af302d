/*
 * Responsibility
 * - /auth handlers: signup, login, refresh, logout
 * - Passwords and sessions are owned by the identity service; these only marshal requests
 * - Signup provisions the customer profile right after the identity is created
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::auth::{
            LoginRequest, LoginResponse, RefreshRequest, SignupRequest, SignupResponse,
            TokenResponse,
        },
        extractors::{ApiJson, Authenticated},
    },
    error::AppError,
    services::{identity::IdentityError, profiles::NewProfile},
    state::AppState,
};

// Login / refresh failures must not reveal whether the account exists.
fn credential_failure(state: &AppState, err: IdentityError) -> AppError {
    match err {
        IdentityError::Rejected | IdentityError::Refused(_) => {
            tracing::info!(error = %err, "sign-in refused");
            AppError::Unauthorized
        }
        other => state.internal(other),
    }
}

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let display_name = req.display_name.as_deref().map(str::trim);

    let created = state
        .identity
        .sign_up(req.email.trim(), &req.password, display_name)
        .await
        .map_err(|err| match err {
            IdentityError::Refused(message) => AppError::bad_request(message),
            IdentityError::Rejected => AppError::Unauthorized,
            other => state.internal(other),
        })?;

    let profile = state
        .profiles
        .create_profile(NewProfile {
            id: created.identity.id,
            email: created.identity.email.clone(),
            display_name: display_name.map(str::to_string),
        })
        .await
        .map_err(|err| state.internal(err))?;

    tracing::info!(user_id = %profile.id, "signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            profile: profile.into(),
            session: created.session.map(TokenResponse::from),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let session = state
        .identity
        .sign_in(req.email.trim(), &req.password)
        .await
        .map_err(|err| credential_failure(&state, err))?;

    let profile = state
        .profiles
        .get_profile(session.identity.id)
        .await
        .map_err(|err| state.internal(err))?
        .ok_or(AppError::not_found("profile"))?;

    Ok(Json(LoginResponse {
        session: session.into(),
        profile: profile.into(),
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let session = state
        .identity
        .refresh(req.refresh_token.trim())
        .await
        .map_err(|err| credential_failure(&state, err))?;

    Ok(Json(session.into()))
}

pub async fn logout(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
) -> Result<StatusCode, AppError> {
    match state.identity.sign_out(ctx.credential().as_str()).await {
        // Already revoked between authentication and now: nothing left to do.
        Ok(()) | Err(IdentityError::Rejected) => {
            tracing::info!(user_id = %ctx.user_id(), "signed out");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => Err(state.internal(err)),
    }
}
