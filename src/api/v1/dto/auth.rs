/*
 * Responsibility
 * - Request/response DTOs for signup / login / refresh
 * - validate() checks shape only; the identity service enforces its own password policy
 */
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::profiles::ProfileResponse;
use crate::services::identity::Session;

const MAX_DISPLAY_NAME: usize = 80;
const MIN_PASSWORD: usize = 6;

fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !looks_like_email(&self.email) {
            return Err("email is invalid");
        }
        if self.password.chars().count() < MIN_PASSWORD {
            return Err("password must be at least 6 characters");
        }
        if let Some(name) = &self.display_name
            && (name.trim().is_empty() || name.chars().count() > MAX_DISPLAY_NAME)
        {
            return Err("display_name must be 1-80 characters");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() {
            return Err("email is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

impl RefreshRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.refresh_token.trim().is_empty() {
            return Err("refresh_token is required");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Usually "bearer"
    pub token_type: String,
    /// Seconds until expiry.
    pub expires_in: u64,
    pub refresh_token: String,
}

impl From<Session> for TokenResponse {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.access_token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            refresh_token: session.refresh_token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub profile: ProfileResponse,
    /// Absent while the identity service waits for email confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<TokenResponse>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session: TokenResponse,
    pub profile: ProfileResponse,
}
