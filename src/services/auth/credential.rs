//! Bearer credential extraction.
//!
//! Sources, in order:
//! 1. `Authorization: Bearer <token>`
//! 2. the session cookie (when a cookie name is configured)
//!
//! The token itself is opaque here; only its presence is checked.
use std::fmt;

use axum::http::{HeaderMap, header};

/// Opaque bearer token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Header,
    Cookie,
}

impl Credential {
    pub fn new(token: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            token: token.into(),
            source,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

pub fn extract(headers: &HeaderMap, cookie_name: Option<&str>) -> Option<Credential> {
    if let Some(token) = bearer_token(headers) {
        return Some(Credential::new(token, CredentialSource::Header));
    }

    cookie_name
        .and_then(|name| cookie_value(headers, name))
        .map(|token| Credential::new(token, CredentialSource::Cookie))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();

    if token.is_empty() { None } else { Some(token) }
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().trim_matches('"'))
        .filter(|v| !v.is_empty())
}
