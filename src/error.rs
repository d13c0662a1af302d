/*
 * Responsibility
 * - The app-wide AppError
 * - IntoResponse (HTTP status + JSON error body)
 * - Conversion of auth / identity / store failures into a single rejection shape
 */
use std::fmt::Display;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::AppEnv;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    // `detail` is only filled in development (see `AppError::internal`).
    #[error("internal server error")]
    Internal { detail: Option<String> },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    /// Internal failure. Collaborator detail is kept only outside production.
    pub fn internal(detail: impl Display, env: AppEnv) -> Self {
        Self::Internal {
            detail: (!env.is_production()).then(|| detail.to_string()),
        }
    }

    /// Map an auth-stage failure to its rejection.
    ///
    /// - NoCredential / InvalidCredential → 401 (same body)
    /// - ProfileNotFound → 404
    /// - Forbidden → 403
    /// - UpstreamUnavailable / OrderingError → 500
    pub fn from_auth(err: AuthError, env: AppEnv) -> Self {
        match err {
            AuthError::NoCredential | AuthError::InvalidCredential(_) => AppError::Unauthorized,
            AuthError::ProfileNotFound => AppError::not_found("profile"),
            AuthError::Forbidden => AppError::Forbidden,
            AuthError::UpstreamUnavailable(detail) => AppError::internal(detail, env),
            err @ AuthError::OrderingError => AppError::internal(err, env),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = match &self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Internal { .. } => "INTERNAL_SERVER_ERROR",
        };
        let message = self.to_string();
        let detail = match self {
            AppError::Internal { detail } => detail,
            _ => None,
        };

        let body = ErrorResponse {
            status: status.as_u16(),
            code,
            message,
            detail,
        };

        (status, Json(body)).into_response()
    }
}
