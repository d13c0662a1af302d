use uuid::Uuid;

use crate::services::auth::context::RequestContext;
use crate::services::auth::error::AuthError;

/// Admit the resource owner, or an admin acting on someone else's resource.
///
/// Synchronous and remote-free: it only reads the context. Route it behind the role
/// guard so `ctx.role()` is the freshly read role.
pub fn ensure_owner_or_admin(ctx: &RequestContext, owner_id: Uuid) -> Result<(), AuthError> {
    if ctx.user_id() == owner_id || ctx.role().is_admin() {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
