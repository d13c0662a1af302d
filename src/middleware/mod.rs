/*
 * Responsibility
 * - Public interface of the middleware (auth chain + HTTP/CORS/security headers)
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
