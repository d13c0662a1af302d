pub mod postgres;
pub mod store;
pub mod types;

pub use postgres::PgProfileStore;
pub use store::{ProfileStore, StoreError, StoreResult};
pub use types::{NewProfile, Profile, ProfileUpdate, Role};
