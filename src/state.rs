/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - identity: IdentityProvider, profiles: ProfileStore, app_env, cookie name
 * - Cloned per request (everything inside is Arc / Copy)
 */
use std::fmt::Display;
use std::sync::Arc;

use crate::config::AppEnv;
use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::services::identity::IdentityProvider;
use crate::services::profiles::ProfileStore;

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub profiles: Arc<dyn ProfileStore>,
    pub app_env: AppEnv,
    session_cookie_name: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        app_env: AppEnv,
    ) -> Self {
        Self {
            identity,
            profiles,
            app_env,
            session_cookie_name: None,
        }
    }

    pub fn with_session_cookie(mut self, name: Option<&str>) -> Self {
        self.session_cookie_name = name.map(Arc::from);
        self
    }

    pub fn session_cookie_name(&self) -> Option<&str> {
        self.session_cookie_name.as_deref()
    }

    pub fn reject(&self, err: AuthError) -> AppError {
        AppError::from_auth(err, self.app_env)
    }

    /// Log an unexpected collaborator failure and turn it into a 500.
    pub fn internal(&self, err: impl Display) -> AppError {
        tracing::error!(error = %err, "unexpected collaborator failure");
        AppError::internal(err, self.app_env)
    }
}
