//! Authorizer core: gate an authenticated request on a freshly read role.
use crate::services::auth::context::RequestContext;
use crate::services::auth::error::AuthError;
use crate::services::profiles::{ProfileStore, Role};

/// Roles a guarded operation admits. Empty means any authenticated role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedRoles(Vec<Role>);

impl AllowedRoles {
    pub fn any() -> Self {
        Self(Vec::new())
    }

    pub fn only(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    pub fn permits(&self, role: Role) -> bool {
        self.is_unrestricted() || self.0.contains(&role)
    }
}

/// Re-read the role for the context's identity, store it back into the context, and
/// check it against `allowed`.
///
/// The role cached by the authenticator is never used for the decision: a role changed
/// by an administrator takes effect on the very next gated request.
///
/// Returns the role the decision was made with.
pub async fn authorize(
    profiles: &dyn ProfileStore,
    ctx: Option<&mut RequestContext>,
    allowed: &AllowedRoles,
) -> Result<Role, AuthError> {
    let ctx = ctx.ok_or(AuthError::OrderingError)?;
    let user_id = ctx.user_id();

    let role = match profiles.get_role(user_id).await {
        Ok(Some(role)) => role,
        Ok(None) => {
            tracing::warn!(user_id = %user_id, "profile vanished before role check");
            return Err(AuthError::ProfileNotFound);
        }
        Err(err) => {
            tracing::warn!(
                user_id = %user_id,
                backend = profiles.backend_name(),
                error = %err,
                "role lookup failed"
            );
            return Err(AuthError::ProfileNotFound);
        }
    };

    if role != ctx.role() {
        tracing::info!(
            user_id = %user_id,
            cached = %ctx.role(),
            current = %role,
            "role changed since authentication"
        );
    }
    ctx.refresh_role(role);

    if !allowed.permits(role) {
        tracing::warn!(user_id = %user_id, role = %role, "role not permitted");
        return Err(AuthError::Forbidden);
    }

    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_admits_every_role() {
        let any = AllowedRoles::any();
        assert!(any.is_unrestricted());
        for role in [Role::Customer, Role::Vendor, Role::Admin] {
            assert!(any.permits(role));
        }
    }

    #[test]
    fn restricted_set_admits_only_members() {
        let staff = AllowedRoles::only([Role::Vendor, Role::Admin]);
        assert!(!staff.permits(Role::Customer));
        assert!(staff.permits(Role::Vendor));
        assert!(staff.permits(Role::Admin));
    }
}
