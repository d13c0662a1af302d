mod common;

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
};

use profile_api::config::AppEnv;
use profile_api::middleware::auth::authorize;
use profile_api::services::auth::AllowedRoles;
use profile_api::services::profiles::Role;

use common::{COOKIE_NAME, Harness, UNREACHABLE_TOKEN, send};

#[tokio::test]
async fn customer_is_forbidden_from_admin_listing() -> Result<()> {
    let h = Harness::new();
    let (_, token) = h.user(Role::Customer);

    let (status, body) = h.send(common::get("/api/v1/profiles", Some(&token))).await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn customer_reads_own_profile() -> Result<()> {
    let h = Harness::new();
    let (id, token) = h.user(Role::Customer);

    let (status, body) = h.send(common::get("/api/v1/profile", Some(&token))).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["role"], "customer");
    Ok(())
}

#[tokio::test]
async fn missing_header_is_401_without_identity_call() -> Result<()> {
    let h = Harness::new();
    h.user(Role::Customer);

    let (status, body) = h.send(common::get("/api/v1/profile", None)).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
    assert_eq!(h.identity.verify_calls(), 0);
    assert_eq!(h.profiles.profile_reads(), 0);
    Ok(())
}

#[tokio::test]
async fn valid_token_without_profile_is_404() -> Result<()> {
    let h = Harness::new();
    let (id, token) = h.user(Role::Customer);
    h.profiles.remove(id);

    let (status, body) = h.send(common::get("/api/v1/profile", Some(&token))).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "profile not found");
    assert_eq!(h.profiles.role_reads(), 0);
    Ok(())
}

#[tokio::test]
async fn invalid_and_missing_credentials_are_indistinguishable() -> Result<()> {
    let h = Harness::new();

    let missing = h.send(common::get("/api/v1/profile", None)).await?;
    let forged = h.send(common::get("/api/v1/profile", Some("forged"))).await?;
    let unreachable = h
        .send(common::get("/api/v1/profile", Some(UNREACHABLE_TOKEN)))
        .await?;

    assert_eq!(missing.0, StatusCode::UNAUTHORIZED);
    assert_eq!(missing, forged);
    assert_eq!(missing, unreachable);
    Ok(())
}

#[tokio::test]
async fn profile_store_outage_is_500_without_detail_in_production() -> Result<()> {
    let h = Harness::with_env(AppEnv::Production);
    let (_, token) = h.user(Role::Customer);
    h.profiles.fail(true);

    let (status, body) = h.send(common::get("/api/v1/profile", Some(&token))).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("detail").is_none());
    Ok(())
}

#[tokio::test]
async fn session_cookie_is_accepted_when_header_is_absent() -> Result<()> {
    let h = Harness::new();
    let (id, token) = h.user(Role::Vendor);

    let req = Request::builder()
        .uri("/api/v1/profile")
        .header(header::COOKIE, format!("{COOKIE_NAME}={token}"))
        .body(Body::empty())?;
    let (status, body) = h.send(req).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());
    Ok(())
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_accepted() -> Result<()> {
    let h = Harness::new();
    let (id, token) = h.user(Role::Customer);

    let req = Request::builder()
        .uri("/api/v1/profile")
        .header(header::AUTHORIZATION, format!("bearer {token}"))
        .body(Body::empty())?;
    let (status, body) = h.send(req).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());
    Ok(())
}

#[tokio::test]
async fn cookie_is_ignored_when_fallback_disabled() -> Result<()> {
    let h = Harness::new();
    let (_, token) = h.user(Role::Vendor);
    let state = h.state.clone().with_session_cookie(None);

    let req = Request::builder()
        .uri("/api/v1/profile")
        .header(header::COOKIE, format!("{COOKIE_NAME}={token}"))
        .body(Body::empty())?;
    let (status, _) = send(profile_api::app::build_api(state), req).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(h.identity.verify_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn role_changed_between_stages_governs_the_decision() -> Result<()> {
    let h = Harness::new();
    let (id, token) = h.user(Role::Admin);
    h.profiles.change_role_after_next_read(id, Role::Customer);

    let (status, _) = h.send(common::get("/api/v1/profiles", Some(&token))).await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn handler_sees_the_freshly_read_role() -> Result<()> {
    let h = Harness::new();
    let (id, token) = h.user(Role::Customer);
    h.profiles.change_role_after_next_read(id, Role::Vendor);

    let (status, body) = h.send(common::get("/api/v1/profile", Some(&token))).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "vendor");
    Ok(())
}

#[tokio::test]
async fn every_gated_request_reads_the_role_once() -> Result<()> {
    let h = Harness::new();
    let (_, token) = h.user(Role::Admin);

    for _ in 0..3 {
        let (status, _) = h.send(common::get("/api/v1/profiles", Some(&token))).await?;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(h.identity.verify_calls(), 3);
    assert_eq!(h.profiles.profile_reads(), 3);
    assert_eq!(h.profiles.role_reads(), 3);
    Ok(())
}

#[tokio::test]
async fn public_routes_skip_the_chain() -> Result<()> {
    let h = Harness::new();

    let (status, body) = h.send(common::get("/api/v1/health", None)).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(h.identity.verify_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn unknown_paths_are_404_without_authentication() -> Result<()> {
    let h = Harness::new();

    let (status, _) = h.send(common::get("/api/v1/nope", None)).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(h.identity.verify_calls(), 0);
    Ok(())
}

fn guard_without_authenticator(h: &Harness) -> Router {
    authorize::apply(
        Router::new().route("/guarded", get(|| async { "reached" })),
        h.state.clone(),
        AllowedRoles::any(),
    )
    .with_state(h.state.clone())
}

#[cfg(debug_assertions)]
#[tokio::test]
#[should_panic(expected = "role guard ran before the authenticator")]
async fn guard_without_authenticator_panics_in_debug_builds() {
    let h = Harness::new();
    let _ = send(guard_without_authenticator(&h), common::get("/guarded", None)).await;
}

#[cfg(not(debug_assertions))]
#[tokio::test]
async fn guard_without_authenticator_fails_closed_in_release_builds() -> Result<()> {
    let h = Harness::new();

    let (status, _) = send(guard_without_authenticator(&h), common::get("/guarded", None)).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(h.profiles.role_reads(), 0);
    Ok(())
}
