/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Hand the authenticated request context (RequestContext) to handlers
 * - The axum-specific part lives in core; the context type itself is owned by services::auth
 *
 * Public API:
 * - Authenticated
 */

mod core;

pub use self::core::Authenticated;
