mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{test_drive_fields, token_for, TestApp};

fn booking(extra: Value) -> Value {
    let mut body = json!({
        "customer_name": "Ann Smith",
        "customer_email": "ann@example.com",
        "vehicle_make": "Volkswagen",
        "vehicle_model": "Golf",
        "drive_date": "2026-11-02",
        "drive_time": "14:30"
    });
    if let (Some(base), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            base.insert(key.clone(), value.clone());
        }
    }
    body
}

#[tokio::test]
async fn test_create_test_drive_with_defaults() {
    let app = TestApp::new();
    app.seed_dealer("user_a", "Alpha Motors").await;
    let token = token_for("user_a");

    let (status, body) = app
        .post("/api/test-drives", &token, booking(json!({ "vehicle_registration": " ab12 cde " })))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "scheduled");
    assert_eq!(body["data"]["duration_minutes"], 30);
    assert_eq!(body["data"]["drive_time"], "14:30:00");
    assert_eq!(body["data"]["vehicle_registration"], "AB12 CDE");
}

#[tokio::test]
async fn test_create_test_drive_rejects_invalid_input() {
    let app = TestApp::new();
    app.seed_dealer("user_a", "Alpha Motors").await;
    let token = token_for("user_a");

    let (status, body) = app
        .post("/api/test-drives", &token, booking(json!({ "duration_minutes": 5 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .post("/api/test-drives", &token, booking(json!({ "drive_time": "25:99" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/test-drives", &token, booking(json!({ "status": "teleported" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_and_orders_by_date_and_time() {
    let app = TestApp::new();
    let dealer = app.seed_dealer("user_a", "Alpha Motors").await;
    let token = token_for("user_a");

    let rows = [
        ("Ann Smith", "Ford", "Focus", "2026-10-21", "15:00"),
        ("Bob Jones", "Audi", "A3", "2026-10-20", "11:00"),
        ("Carla Diaz", "Ford", "Puma", "2026-10-20", "09:30"),
    ];
    for (name, make, model, date, time) in rows {
        app.store
            .insert_test_drive(dealer.id, test_drive_fields(name, make, model, date, time))
            .await;
    }

    let (status, body) = app.get("/api/test-drives", &token).await;
    assert_eq!(status, StatusCode::OK);
    let order: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["customer_name"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["Carla Diaz", "Bob Jones", "Ann Smith"]);

    let (_, body) = app.get("/api/test-drives?date=2026-10-20&search=ford", &token).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["vehicle_model"], "Puma");

    let (_, body) = app.get("/api/test-drives?status=completed", &token).await;
    assert_eq!(body["count"], 0);

    let (status, body) = app.get("/api/test-drives?date=20/10/2026", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date '20/10/2026', expected YYYY-MM-DD");
}

#[tokio::test]
async fn test_update_test_drive_status() {
    let app = TestApp::new();
    app.seed_dealer("user_a", "Alpha Motors").await;
    let token = token_for("user_a");

    let (_, created) = app.post("/api/test-drives", &token, booking(json!({}))).await;
    let uri = format!("/api/test-drives/{}", created["data"]["id"].as_str().unwrap());

    let (status, body) = app
        .put(&uri, &token, booking(json!({ "status": "completed", "duration_minutes": 45, "notes": "Liked it" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["duration_minutes"], 45);

    let (_, body) = app.get("/api/test-drives?status=completed", &token).await;
    assert_eq!(body["count"], 1);

    let missing = "/api/test-drives/00000000-0000-4000-8000-000000000000";
    let (status, _) = app.put(missing, &token, booking(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
