/*
 * Responsibility
 * - The authenticated request context handed from the middleware chain to handlers
 * - Built once by the authenticator and stored in the request extensions
 * - Dropped with the request; never persisted or shared
 *
 * Notes
 * - The role is refreshed in place by the authorizer; handlers always see the latest read
 */
use uuid::Uuid;

use crate::services::auth::credential::Credential;
use crate::services::identity::Identity;
use crate::services::profiles::{Profile, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    identity: Identity,
    profile: Profile,
    credential: Credential,
}

impl RequestContext {
    pub fn new(identity: Identity, profile: Profile, credential: Credential) -> Self {
        Self {
            identity,
            profile,
            credential,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.identity.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn refresh_role(&mut self, role: Role) {
        self.profile.role = role;
    }

    pub fn into_profile(self) -> Profile {
        self.profile
    }
}
