use thiserror::Error;

/// Outcome of a failed authentication / authorization stage.
///
/// `NoCredential` and `InvalidCredential` render identically so a caller cannot tell
/// which stage refused the token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no credential presented")]
    NoCredential,
    #[error("credential rejected by identity service: {0}")]
    InvalidCredential(String),
    #[error("profile not found")]
    ProfileNotFound,
    #[error("profile store unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("role not permitted")]
    Forbidden,
    #[error("role guard ran without an authenticated request context")]
    OrderingError,
}
