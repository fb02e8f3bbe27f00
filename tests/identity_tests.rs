mod common;

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use serde_json::json;

use common::{expired_token_for, read_json, token_for, TestApp};

const RESOURCE_ROUTES: &[(&str, &str)] = &[
    ("GET", "/api/customers"),
    ("POST", "/api/customers"),
    ("GET", "/api/customers/8a1f3c52-4c1e-4f7a-9d77-5f1d2b8e9a10"),
    ("PUT", "/api/customers/8a1f3c52-4c1e-4f7a-9d77-5f1d2b8e9a10"),
    ("GET", "/api/test-drives"),
    ("POST", "/api/test-drives"),
    ("GET", "/api/test-drives/8a1f3c52-4c1e-4f7a-9d77-5f1d2b8e9a10"),
    ("PUT", "/api/test-drives/8a1f3c52-4c1e-4f7a-9d77-5f1d2b8e9a10"),
    ("GET", "/api/vehicle-costs"),
    ("GET", "/api/return-costs"),
    ("POST", "/api/documents/pdf"),
    ("GET", "/api/dealer"),
    ("PUT", "/api/dealer"),
    ("POST", "/api/dealer/onboard"),
];

#[tokio::test]
async fn test_missing_identity_is_rejected_without_queries() {
    let app = TestApp::new();
    app.seed_dealer("user_a", "Alpha Motors").await;

    for (method, uri) in RESOURCE_ROUTES {
        let method: Method = method.parse().unwrap();
        let body = (method != Method::GET).then(|| json!({}));
        let (status, body) = app.request(method.clone(), uri, None, body).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Authentication required");
    }

    assert_eq!(app.store.query_count(), 0);
}

#[tokio::test]
async fn test_invalid_and_expired_tokens_are_rejected_without_queries() {
    let app = TestApp::new();
    app.seed_dealer("user_a", "Alpha Motors").await;

    let (status, body) = app.get("/api/customers", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");

    let (status, body) = app.get("/api/customers", &expired_token_for("user_a")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token expired");

    let mut forged = token_for("user_a");
    forged.push('x');
    let (status, _) = app.get("/api/customers", &forged).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.store.query_count(), 0);
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let app = TestApp::new();
    app.seed_dealer("user_a", "Alpha Motors").await;

    let request = Request::builder()
        .uri("/api/dealer")
        .header(header::COOKIE, format!("theme=dark; __session={}", token_for("user_a")))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["business_name"], "Alpha Motors");
}

#[tokio::test]
async fn test_identity_without_dealer_is_not_found() {
    let app = TestApp::new();
    let token = token_for("user_without_dealer");

    let (status, body) = app.get("/api/customers", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Dealer profile not found");

    let (status, _) = app.get("/api/dealer", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_onboarding_is_idempotent() {
    let app = TestApp::new();
    let token = token_for("new_user");
    let profile = json!({ "business_name": "  Northside Cars ", "phone": "+44 20 7946 0000" });

    let (status, body) = app.post("/api/dealer/onboard", &token, profile.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["business_name"], "Northside Cars");
    assert_eq!(body["data"]["contact_email"], "new_user@identity.test");
    let dealer_id = body["data"]["id"].clone();

    let (status, body) = app.post("/api/dealer/onboard", &token, profile).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], dealer_id);

    let (status, body) = app.get("/api/dealer", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], dealer_id);
    assert!(body["data"].get("external_user_id").is_some());
}

#[tokio::test]
async fn test_onboarding_validates_profile() {
    let app = TestApp::new();
    let token = token_for("new_user");

    let (status, body) = app
        .post("/api/dealer/onboard", &token, json!({ "business_name": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app.post("/api/dealer/onboard", &token, json!({ "name": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dealer_profile_update() {
    let app = TestApp::new();
    app.seed_dealer("user_a", "Alpha Motors").await;
    let token = token_for("user_a");

    let (status, body) = app
        .put(
            "/api/dealer",
            &token,
            json!({ "business_name": "Alpha Motors Ltd", "contact_email": "sales@alpha.test", "address": "" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["business_name"], "Alpha Motors Ltd");
    assert_eq!(body["data"]["contact_email"], "sales@alpha.test");
    assert_eq!(body["data"]["address"], serde_json::Value::Null);
}
