//! Integration tests for the authentication flow.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn register_then_login() {
    let app = TestApp::new();
    app.register("alice", "password123").await;

    let token = app.login("alice", "password123").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": "bob",
                "password": "short",
                "email": "bob@test.com",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let app = TestApp::new();
    app.register("carol", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "username": "carol",
                "password": "password456",
                "email": "carol2@test.com",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.register("dave", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "dave",
                "password": "wrongpassword",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_unknown_user_matches_wrong_password_shape() {
    let app = TestApp::new();
    app.register("erin", "password123").await;

    let unknown = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"username": "nobody", "password": "password123"})),
            None,
        )
        .await;
    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"username": "erin", "password": "bad-password"})),
            None,
        )
        .await;

    // Identical status and body so the login path does not leak which
    // usernames exist.
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, wrong.status);
    assert_eq!(unknown.body, wrong.body);
}

#[tokio::test]
async fn login_rate_limit_returns_429() {
    let app = TestApp::new();
    app.register("frank", "password123").await;

    let max = app.state.config.auth.rate_limit_max_attempts;
    for _ in 0..max {
        let response = app
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({"username": "frank", "password": "bad"})),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"username": "frank", "password": "password123"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = TestApp::new();
    let token = app.register("grace", "password123").await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The revoked token can no longer be refreshed.
    let response = app
        .request("POST", "/api/auth/refresh", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "AUTH_REVOKED");
}

#[tokio::test]
async fn refresh_issues_a_fresh_token() {
    let app = TestApp::new();
    let token = app.register("heidi", "password123").await;

    let response = app
        .request("POST", "/api/auth/refresh", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let fresh = response.body["data"]["token"].as_str().unwrap();
    assert!(app.state.verifier.verify(fresh).is_ok());
    assert_eq!(response.body["data"]["user"]["username"], "heidi");
}

#[tokio::test]
async fn refresh_rejects_garbage_token() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/auth/refresh", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["connections"], 0);
}
