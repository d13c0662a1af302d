use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::services::identity::provider::{
    Identity, IdentityError, IdentityProvider, IdentityResult, Session, SignUp,
};

/// Access-token claims issued by the hosted auth service.
///
/// NOTE:
/// - A `role` claim may be present in the token; it is not read.
///   Authorization always uses the role from the profile store.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub exp: u64,
    #[serde(default)]
    pub email: Option<String>,
}

/// Verifies access tokens locally (HS256 with the project's JWT secret) and delegates
/// every other operation to the remote provider.
///
/// A token revoked server-side keeps verifying here until it expires.
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
    remote: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtIdentityProvider")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtIdentityProvider {
    pub fn new(secret: &str, audience: &str, remote: Arc<dyn IdentityProvider>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            remote,
        }
    }

    /// Signature + exp + aud check, then `sub` must be a UUID.
    pub fn decode(&self, token: &str) -> IdentityResult<Identity> {
        let data = jsonwebtoken::decode::<AccessTokenClaims>(
            token,
            &self.decoding_key,
            &self.validation,
        )
        .map_err(|err| {
            tracing::debug!(error = %err, "local access token verification failed");
            IdentityError::Rejected
        })?;

        let id = Uuid::parse_str(data.claims.sub.trim()).map_err(|_| IdentityError::Rejected)?;

        Ok(Identity {
            id,
            email: data.claims.email.filter(|e| !e.trim().is_empty()),
        })
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify(&self, token: &str) -> IdentityResult<Identity> {
        self.decode(token)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> IdentityResult<SignUp> {
        self.remote.sign_up(email, password, display_name).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<Session> {
        self.remote.sign_in(email, password).await
    }

    async fn refresh(&self, refresh_token: &str) -> IdentityResult<Session> {
        self.remote.refresh(refresh_token).await
    }

    async fn sign_out(&self, token: &str) -> IdentityResult<()> {
        self.remote.sign_out(token).await
    }
}
