//! Authenticator core: credential → verified identity → profile → `RequestContext`.
//!
//! Core-only: no axum types. The middleware extracts the credential and stores the
//! resulting context; everything in between lives here so it can be tested against
//! in-memory collaborators.
use crate::services::auth::context::RequestContext;
use crate::services::auth::credential::Credential;
use crate::services::auth::error::AuthError;
use crate::services::identity::IdentityProvider;
use crate::services::profiles::ProfileStore;

/// Resolve a credential into a request context.
///
/// 1. no credential → `NoCredential` (no remote call is made)
/// 2. identity service refuses or fails → `InvalidCredential` (network errors and timeouts included)
/// 3. no profile row → `ProfileNotFound`; store failure → `UpstreamUnavailable`
///
/// Nothing is returned on any failure path, so no partial context can leak into the request.
pub async fn authenticate(
    identity: &dyn IdentityProvider,
    profiles: &dyn ProfileStore,
    credential: Option<Credential>,
) -> Result<RequestContext, AuthError> {
    let credential = credential.ok_or(AuthError::NoCredential)?;

    let verified = identity
        .verify(credential.as_str())
        .await
        .map_err(|err| AuthError::InvalidCredential(err.to_string()))?;

    let profile = match profiles.get_profile(verified.id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            tracing::warn!(user_id = %verified.id, "verified identity has no profile row");
            return Err(AuthError::ProfileNotFound);
        }
        Err(err) => {
            tracing::error!(
                user_id = %verified.id,
                backend = profiles.backend_name(),
                error = %err,
                "profile lookup failed during authentication"
            );
            return Err(AuthError::UpstreamUnavailable(err.to_string()));
        }
    };

    Ok(RequestContext::new(verified, profile, credential))
}
