pub mod auth_ctx;
pub mod input;

pub use auth_ctx::Authenticated;
pub use input::{ApiJson, ApiPath, ApiQuery};
