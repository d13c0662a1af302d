/*
 * Responsibility
 * - SQLx operations on the `profiles` table of the hosted Postgres
 * - Takes a PgPool; rows come back untyped (role as text) and are converted by the store
 * - Row-level security lives in the database, not here
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn get(db: &PgPool, id: Uuid) -> RepoResult<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT id, email, display_name, avatar_url, role::text AS role, created_at, updated_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn get_role(db: &PgPool, id: Uuid) -> RepoResult<Option<String>> {
    let role = sqlx::query_scalar::<_, String>(
        r#"
        SELECT role::text
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(role)
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> RepoResult<Vec<ProfileRow>> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT id, email, display_name, avatar_url, role::text AS role, created_at, updated_at
        FROM profiles
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// Provision a profile for a freshly signed-up identity.
///
/// A database trigger may already have inserted the row; in that case the existing
/// row is kept and only an empty display name is filled in.
pub async fn create(
    db: &PgPool,
    id: Uuid,
    email: Option<&str>,
    display_name: Option<&str>,
) -> RepoResult<ProfileRow> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles (id, email, display_name, role)
        VALUES ($1, $2, $3, 'customer')
        ON CONFLICT (id) DO UPDATE
        SET display_name = COALESCE(profiles.display_name, EXCLUDED.display_name)
        RETURNING id, email, display_name, avatar_url, role::text AS role, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(display_name)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    display_name: Option<&str>,
    avatar_url: Option<Option<&str>>,
) -> RepoResult<Option<ProfileRow>> {
    // avatar_url: Some(Some(v)) -> set to v
    // avatar_url: Some(None)    -> set to NULL
    // avatar_url: None          -> do not update
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles
        SET
            display_name = COALESCE($2, display_name),
            avatar_url = CASE
                WHEN $3 = false THEN avatar_url
                ELSE $4
            END,
            updated_at = now()
        WHERE id = $1
        RETURNING id, email, display_name, avatar_url, role::text AS role, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(display_name)
    .bind(avatar_url.is_some()) // $3: flag to set avatar_url
    .bind(avatar_url.flatten()) // $4: new avatar_url value
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn set_role(db: &PgPool, id: Uuid, role: &str) -> RepoResult<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles
        SET role = $2, updated_at = now()
        WHERE id = $1
        RETURNING id, email, display_name, avatar_url, role::text AS role, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(role)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
