pub mod factory;
pub mod jwt;
pub mod provider;
pub mod remote;

pub use factory::build_identity_provider;
pub use jwt::JwtIdentityProvider;
pub use provider::{Identity, IdentityError, IdentityProvider, IdentityResult, Session, SignUp};
pub use remote::RemoteIdentityProvider;
