use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::repos::{error::RepoError, profile_repo};
use crate::services::profiles::store::{ProfileStore, StoreError, StoreResult};
use crate::services::profiles::types::{NewProfile, Profile, ProfileUpdate, Role};

/// Postgres-backed profile store (the hosted platform's database).
///
/// The pool's acquire timeout bounds how long a request waits for the store;
/// a timeout surfaces as `StoreError::Unavailable`.
#[derive(Clone, Debug)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self { pool })
    }
}

fn store_error(e: RepoError) -> StoreError {
    match e {
        RepoError::Db(sqlx::Error::PoolTimedOut) => {
            StoreError::Unavailable("timed out waiting for a connection".into())
        }
        RepoError::Db(sqlx::Error::Io(io)) => StoreError::Unavailable(io.to_string()),
        other => StoreError::Repo(other),
    }
}

fn parse_role(raw: &str) -> StoreResult<Role> {
    raw.parse::<Role>()
        .map_err(|e| StoreError::InvalidRow(e.to_string()))
}

fn row_to_profile(row: profile_repo::ProfileRow) -> StoreResult<Profile> {
    Ok(Profile {
        role: parse_role(&row.role)?,
        id: row.id,
        email: row.email,
        display_name: row.display_name,
        avatar_url: row.avatar_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn get_profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        profile_repo::get(&self.pool, id)
            .await
            .map_err(store_error)?
            .map(row_to_profile)
            .transpose()
    }

    async fn get_role(&self, id: Uuid) -> StoreResult<Option<Role>> {
        profile_repo::get_role(&self.pool, id)
            .await
            .map_err(store_error)?
            .as_deref()
            .map(parse_role)
            .transpose()
    }

    async fn create_profile(&self, new: NewProfile) -> StoreResult<Profile> {
        let row = profile_repo::create(
            &self.pool,
            new.id,
            new.email.as_deref(),
            new.display_name.as_deref(),
        )
        .await
        .map_err(store_error)?;

        row_to_profile(row)
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> StoreResult<Option<Profile>> {
        let avatar_url: Option<Option<&str>> =
            update.avatar_url.as_ref().map(|inner| inner.as_deref());

        profile_repo::update(&self.pool, id, update.display_name.as_deref(), avatar_url)
            .await
            .map_err(store_error)?
            .map(row_to_profile)
            .transpose()
    }

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<Option<Profile>> {
        profile_repo::set_role(&self.pool, id, role.as_str())
            .await
            .map_err(store_error)?
            .map(row_to_profile)
            .transpose()
    }

    async fn list_profiles(&self, limit: i64, offset: i64) -> StoreResult<Vec<Profile>> {
        let rows = profile_repo::list(&self.pool, limit, offset)
            .await
            .map_err(store_error)?;

        // One malformed row fails the whole page.
        rows.into_iter().map(row_to_profile).collect()
    }
}
