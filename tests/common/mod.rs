#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use tower::ServiceExt;
use uuid::Uuid;

use profile_api::app;
use profile_api::config::AppEnv;
use profile_api::services::identity::{
    Identity, IdentityError, IdentityProvider, IdentityResult, Session, SignUp,
};
use profile_api::services::profiles::{
    NewProfile, Profile, ProfileStore, ProfileUpdate, Role, StoreError, StoreResult,
};
use profile_api::state::AppState;

pub const COOKIE_NAME: &str = "sb-access-token";

/// Token that makes the fake identity service behave as if it were unreachable.
pub const UNREACHABLE_TOKEN: &str = "unreachable";

pub fn profile(id: Uuid, role: Role) -> Profile {
    let now = Utc::now();
    Profile {
        id,
        email: Some(format!("{id}@example.com")),
        display_name: None,
        avatar_url: None,
        role,
        created_at: now,
        updated_at: now,
    }
}

// ---- identity service ----

#[derive(Default)]
pub struct FakeIdentity {
    access: Mutex<HashMap<String, Identity>>,
    refresh: Mutex<HashMap<String, Identity>>,
    // email -> (password, identity)
    accounts: Mutex<HashMap<String, (String, Identity)>>,
    verify_calls: AtomicUsize,
}

impl FakeIdentity {
    /// Register a token that verifies to `id`.
    pub fn issue(&self, token: &str, id: Uuid) {
        self.access.lock().unwrap().insert(
            token.to_string(),
            Identity {
                id,
                email: Some(format!("{id}@example.com")),
            },
        );
    }

    pub fn register(&self, email: &str, password: &str, id: Uuid) {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            (
                password.to_string(),
                Identity {
                    id,
                    email: Some(email.to_string()),
                },
            ),
        );
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn is_live(&self, token: &str) -> bool {
        self.access.lock().unwrap().contains_key(token)
    }

    fn session_for(&self, identity: Identity) -> Session {
        let access_token = format!("access-{}", Uuid::new_v4());
        let refresh_token = format!("refresh-{}", Uuid::new_v4());
        self.access
            .lock()
            .unwrap()
            .insert(access_token.clone(), identity.clone());
        self.refresh
            .lock()
            .unwrap()
            .insert(refresh_token.clone(), identity.clone());

        Session {
            access_token,
            token_type: "bearer".into(),
            expires_in: 3600,
            refresh_token,
            identity,
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn verify(&self, token: &str) -> IdentityResult<Identity> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if token == UNREACHABLE_TOKEN {
            return Err(IdentityError::Unavailable("connection refused".into()));
        }
        self.access
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(IdentityError::Rejected)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _display_name: Option<&str>,
    ) -> IdentityResult<SignUp> {
        if self.accounts.lock().unwrap().contains_key(email) {
            return Err(IdentityError::Refused("User already registered".into()));
        }
        let id = Uuid::new_v4();
        self.register(email, password, id);
        let identity = Identity {
            id,
            email: Some(email.to_string()),
        };

        Ok(SignUp {
            identity: identity.clone(),
            session: Some(self.session_for(identity)),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<Session> {
        let account = self.accounts.lock().unwrap().get(email).cloned();
        match account {
            Some((expected, identity)) if expected == password => Ok(self.session_for(identity)),
            _ => Err(IdentityError::Refused("Invalid login credentials".into())),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> IdentityResult<Session> {
        let identity = self.refresh.lock().unwrap().remove(refresh_token);
        match identity {
            Some(identity) => Ok(self.session_for(identity)),
            None => Err(IdentityError::Rejected),
        }
    }

    async fn sign_out(&self, token: &str) -> IdentityResult<()> {
        match self.access.lock().unwrap().remove(token) {
            Some(_) => Ok(()),
            None => Err(IdentityError::Rejected),
        }
    }
}

// ---- profile store ----

#[derive(Default)]
pub struct MemoryProfiles {
    rows: Mutex<HashMap<Uuid, Profile>>,
    // Applied right after the next full profile read for that id.
    pending_role_change: Mutex<HashMap<Uuid, Role>>,
    profile_reads: AtomicUsize,
    role_reads: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryProfiles {
    pub fn insert(&self, profile: Profile) {
        self.rows.lock().unwrap().insert(profile.id, profile);
    }

    pub fn remove(&self, id: Uuid) {
        self.rows.lock().unwrap().remove(&id);
    }

    pub fn role_of(&self, id: Uuid) -> Option<Role> {
        self.rows.lock().unwrap().get(&id).map(|p| p.role)
    }

    /// Simulate an administrator changing the role between the authenticator's read
    /// and the authorizer's read.
    pub fn change_role_after_next_read(&self, id: Uuid, role: Role) {
        self.pending_role_change.lock().unwrap().insert(id, role);
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn profile_reads(&self) -> usize {
        self.profile_reads.load(Ordering::SeqCst)
    }

    pub fn role_reads(&self) -> usize {
        self.role_reads.load(Ordering::SeqCst)
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        self.profile_reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let mut rows = self.rows.lock().unwrap();
        let found = rows.get(&id).cloned();
        if let Some(role) = self.pending_role_change.lock().unwrap().remove(&id)
            && let Some(row) = rows.get_mut(&id)
        {
            row.role = role;
        }
        Ok(found)
    }

    async fn get_role(&self, id: Uuid) -> StoreResult<Option<Role>> {
        self.role_reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.role_of(id))
    }

    async fn create_profile(&self, new: NewProfile) -> StoreResult<Profile> {
        self.check()?;
        let mut row = profile(new.id, Role::Customer);
        row.email = new.email;
        row.display_name = new.display_name;

        let mut rows = self.rows.lock().unwrap();
        Ok(rows.entry(new.id).or_insert(row).clone())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> StoreResult<Option<Profile>> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = update.display_name {
            row.display_name = Some(name);
        }
        if let Some(avatar) = update.avatar_url {
            row.avatar_url = avatar;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<Option<Profile>> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(&id).map(|row| {
            row.role = role;
            row.clone()
        }))
    }

    async fn list_profiles(&self, limit: i64, offset: i64) -> StoreResult<Vec<Profile>> {
        self.check()?;
        let mut all: Vec<Profile> = self.rows.lock().unwrap().values().cloned().collect();
        all.sort_by_key(|p| (p.created_at, p.id));
        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

// ---- app harness ----

pub struct Harness {
    pub identity: Arc<FakeIdentity>,
    pub profiles: Arc<MemoryProfiles>,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_env(AppEnv::Development)
    }

    pub fn with_env(app_env: AppEnv) -> Self {
        let identity = Arc::new(FakeIdentity::default());
        let profiles = Arc::new(MemoryProfiles::default());
        let state = AppState::new(identity.clone(), profiles.clone(), app_env)
            .with_session_cookie(Some(COOKIE_NAME));

        Self {
            identity,
            profiles,
            state,
        }
    }

    /// Create a user with a profile and return (id, access token).
    pub fn user(&self, role: Role) -> (Uuid, String) {
        let id = Uuid::new_v4();
        let token = format!("token-{id}");
        self.identity.issue(&token, id);
        self.profiles.insert(profile(id, role));
        (id, token)
    }

    pub fn router(&self) -> Router {
        app::build_api(self.state.clone())
    }

    pub async fn send(&self, req: Request<Body>) -> Result<(StatusCode, serde_json::Value)> {
        send(self.router(), req).await
    }
}

pub async fn send(
    router: Router,
    req: Request<Body>,
) -> Result<(StatusCode, serde_json::Value)> {
    let resp = router.oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request(Method::GET, uri, token, None)
}
