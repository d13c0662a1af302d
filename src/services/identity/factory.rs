//! Factory: build the identity provider from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::identity::{
    IdentityProvider, IdentityResult, JwtIdentityProvider, RemoteIdentityProvider,
};

pub fn build_identity_provider(config: &Config) -> IdentityResult<Arc<dyn IdentityProvider>> {
    let remote: Arc<dyn IdentityProvider> = Arc::new(RemoteIdentityProvider::new(
        config.identity_url.clone(),
        config.identity_api_key.clone(),
        config.identity_timeout,
    )?);

    match config.identity_jwt_secret.as_deref() {
        Some(secret) => {
            tracing::info!("verifying access tokens locally (HS256)");
            Ok(Arc::new(JwtIdentityProvider::new(
                secret,
                &config.identity_jwt_audience,
                remote,
            )))
        }
        None => Ok(remote),
    }
}
