//! Profile store interface used by the auth middleware and the profile handlers.
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::profiles::types::{NewProfile, Profile, ProfileUpdate, Role};

pub type StoreResult<T> = Result<T, StoreError>;

/// Profile-store errors (transport / query / row shape).
///
/// Kept independent from `AppError` so callers decide how to fail
/// (the authenticator fails closed, the authorizer reports NotFound).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("invalid profile row: {0}")]
    InvalidRow(String),
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to the externally owned profile records.
///
/// Every call is a remote round trip; nothing is cached on this side.
#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    // Returns the store name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn get_profile(&self, id: Uuid) -> StoreResult<Option<Profile>>;

    // Reads only the role column. Used by the authorizer on every gated request.
    async fn get_role(&self, id: Uuid) -> StoreResult<Option<Role>>;

    async fn create_profile(&self, new: NewProfile) -> StoreResult<Profile>;

    // Returns `Ok(None)` when no row exists for `id`.
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> StoreResult<Option<Profile>>;

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<Option<Profile>>;

    async fn list_profiles(&self, limit: i64, offset: i64) -> StoreResult<Vec<Profile>>;
}
