//! HTTP client for the hosted auth REST API.
//!
//! Endpoints used (relative to the project URL):
//! - `GET  auth/v1/user`                          resolve an access token
//! - `POST auth/v1/signup`                        create an identity
//! - `POST auth/v1/token?grant_type=password`     password sign-in
//! - `POST auth/v1/token?grant_type=refresh_token`
//! - `POST auth/v1/logout`                        revoke the current session
//!
//! Every request carries the project key in the `apikey` header. The client timeout
//! bounds each call; a timeout is reported as `IdentityError::Unavailable`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::services::identity::provider::{
    Identity, IdentityError, IdentityProvider, IdentityResult, Session, SignUp,
};

#[derive(Clone)]
pub struct RemoteIdentityProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for RemoteIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the api key
        f.debug_struct("RemoteIdentityProvider")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl RemoteIdentityProvider {
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> IdentityResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> IdentityResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| IdentityError::Unavailable(format!("invalid endpoint {path}: {e}")))
    }

    fn token_endpoint(&self, grant_type: &str) -> IdentityResult<Url> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        Ok(url)
    }

    async fn post_for_session(
        &self,
        url: Url,
        body: serde_json::Value,
    ) -> IdentityResult<Session> {
        let resp = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(failure(status, &resp.bytes().await.unwrap_or_default()));
        }

        let body: SessionBody = resp
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        Ok(body.into())
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn transport(e: reqwest::Error) -> IdentityError {
    if e.is_timeout() {
        IdentityError::Unavailable("request timed out".into())
    } else {
        IdentityError::Unavailable(e.to_string())
    }
}

/// Map a non-success response to an error.
fn failure(status: StatusCode, body: &[u8]) -> IdentityError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return IdentityError::Rejected;
    }
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return IdentityError::Unavailable(format!("status {}", status.as_u16()));
    }

    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| format!("status {}", status.as_u16()));

    IdentityError::Refused(message)
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserBody> for Identity {
    fn from(user: UserBody) -> Self {
        Self {
            id: user.id,
            // Phone-only users come back with an empty email
            email: user.email.filter(|e| !e.trim().is_empty()),
        }
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: u64,
    refresh_token: String,
    user: UserBody,
}

impl From<SessionBody> for Session {
    fn from(body: SessionBody) -> Self {
        Self {
            access_token: body.access_token,
            token_type: body.token_type,
            expires_in: body.expires_in,
            refresh_token: body.refresh_token,
            identity: body.user.into(),
        }
    }
}

// Signup answers with a full session when auto-confirm is on, otherwise with the bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session(SessionBody),
    User(UserBody),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    async fn verify(&self, token: &str) -> IdentityResult<Identity> {
        let resp = self
            .client
            .get(self.endpoint("auth/v1/user")?)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            // Any client-side refusal of a token means the token is no good.
            return Err(match failure(status, &resp.bytes().await.unwrap_or_default()) {
                IdentityError::Refused(_) => IdentityError::Rejected,
                other => other,
            });
        }

        let user: UserBody = resp
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        Ok(user.into())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> IdentityResult<SignUp> {
        let resp = self
            .client
            .post(self.endpoint("auth/v1/signup")?)
            .header("apikey", &self.api_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "display_name": display_name },
            }))
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(failure(status, &resp.bytes().await.unwrap_or_default()));
        }

        let body: SignUpBody = resp
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        Ok(match body {
            SignUpBody::Session(session) => {
                let session = Session::from(session);
                SignUp {
                    identity: session.identity.clone(),
                    session: Some(session),
                }
            }
            SignUpBody::User(user) => SignUp {
                identity: user.into(),
                session: None,
            },
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<Session> {
        let url = self.token_endpoint("password")?;
        self.post_for_session(url, json!({ "email": email, "password": password }))
            .await
    }

    async fn refresh(&self, refresh_token: &str) -> IdentityResult<Session> {
        let url = self.token_endpoint("refresh_token")?;
        self.post_for_session(url, json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn sign_out(&self, token: &str) -> IdentityResult<()> {
        let resp = self
            .client
            .post(self.endpoint("auth/v1/logout")?)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(failure(status, &resp.bytes().await.unwrap_or_default()));
        }

        Ok(())
    }
}
