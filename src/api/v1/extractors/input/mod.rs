mod core;

pub use self::core::{ApiJson, ApiPath, ApiQuery};
