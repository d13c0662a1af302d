pub mod authenticate;
pub mod authorize;
