/*
 * Responsibility
 * - Request/response DTOs for profiles and role management
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::services::profiles::{Profile, ProfileUpdate, Role};

const MAX_DISPLAY_NAME: usize = 80;
const MAX_AVATAR_URL: usize = 512;
const MAX_PAGE: i64 = 100;
const DEFAULT_PAGE: i64 = 50;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            display_name: p.display_name,
            avatar_url: p.avatar_url,
            role: p.role,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// A present `null` must stay distinguishable from a missing field.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    // Tri-state:
    // - None: field missing (do not update)
    // - Some(None): null (clear)
    // - Some(Some(v)): set value
    #[serde(default, deserialize_with = "present")]
    pub avatar_url: Option<Option<String>>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.display_name
            && (name.trim().is_empty() || name.chars().count() > MAX_DISPLAY_NAME)
        {
            return Err("display_name must be 1-80 characters");
        }
        if let Some(Some(url)) = &self.avatar_url
            && (url.len() > MAX_AVATAR_URL || url::Url::parse(url).is_err())
        {
            return Err("avatar_url must be an absolute URL of at most 512 chars");
        }
        Ok(())
    }

    /// Validated update; rejects a request that changes nothing.
    pub fn into_update(self) -> Result<ProfileUpdate, &'static str> {
        self.validate()?;

        let update = ProfileUpdate {
            display_name: self.display_name.map(|n| n.trim().to_string()),
            avatar_url: self.avatar_url,
        };
        if update.is_empty() {
            return Err("nothing to update");
        }
        Ok(update)
    }
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProfilesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListProfilesQuery {
    /// Returns (limit, offset).
    pub fn page(&self) -> Result<(i64, i64), &'static str> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE);
        let offset = self.offset.unwrap_or(0);

        if !(1..=MAX_PAGE).contains(&limit) {
            return Err("limit must be between 1 and 100");
        }
        if offset < 0 {
            return Err("offset must be >= 0");
        }
        Ok((limit, offset))
    }
}
