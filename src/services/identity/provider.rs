//! Identity collaborator interface (the hosted auth service of record).
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Subject confirmed by the identity service.
///
/// Only ever produced by a successful `verify` / `sign_in` / `sign_up`; never built from
/// client-supplied data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Tokens issued by the identity service.
#[derive(Clone)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_token: String,
    pub identity: Identity,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print token material
        f.debug_struct("Session")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("identity", &self.identity)
            .finish()
    }
}

/// Result of a signup. `session` is None when the service requires email confirmation first.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub identity: Identity,
    pub session: Option<Session>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    // Invalid, expired, revoked or unknown credential.
    #[error("credential rejected by identity service")]
    Rejected,
    // The service understood the request and refused it (duplicate email, weak password, ...).
    #[error("identity service refused the request: {0}")]
    Refused(String),
    // Transport error, timeout, 5xx or rate limit.
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected identity service response: {0}")]
    InvalidResponse(String),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Remote identity capability.
///
/// Implementations must be cheap to share (`Arc<dyn IdentityProvider>` in `AppState`).
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    // Resolve a bearer credential to the identity it was issued for.
    async fn verify(&self, token: &str) -> IdentityResult<Identity>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> IdentityResult<SignUp>;

    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<Session>;

    async fn refresh(&self, refresh_token: &str) -> IdentityResult<Session>;

    // Revoke the session the access token belongs to.
    async fn sign_out(&self, token: &str) -> IdentityResult<()>;
}
