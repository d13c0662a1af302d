pub mod authenticator;
pub mod authorizer;
pub mod context;
pub mod credential;
pub mod error;
pub mod ownership;

pub use authenticator::authenticate;
pub use authorizer::{AllowedRoles, authorize};
pub use context::RequestContext;
pub use credential::{Credential, CredentialSource};
pub use error::AuthError;
pub use ownership::ensure_owner_or_admin;
