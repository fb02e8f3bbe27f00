mod common;

use std::str::FromStr;

use axum::http::StatusCode;
use rust_decimal::Decimal;

use dealership_manager::models::cost::{NewReturnCost, NewVehicleCost, VehicleCostCategory};
use common::{token_for, TestApp};

fn vehicle_cost(stock: &str, category: VehicleCostCategory, amount: &str) -> NewVehicleCost {
    NewVehicleCost {
        stock_number: stock.to_string(),
        vehicle_description: Some("2019 Ford Focus".to_string()),
        category,
        description: None,
        amount: Decimal::from_str(amount).unwrap(),
        incurred_on: None,
    }
}

#[tokio::test]
async fn test_vehicle_costs_include_count_and_total() {
    let app = TestApp::new();
    let dealer = app.seed_dealer("user_a", "Alpha Motors").await;
    for (stock, category, amount) in [
        ("STK-1", VehicleCostCategory::Purchase, "8500.00"),
        ("STK-1", VehicleCostCategory::Preparation, "0.10"),
        ("STK-2", VehicleCostCategory::Transport, "0.20"),
    ] {
        app.store.insert_vehicle_cost(dealer.id, vehicle_cost(stock, category, amount)).await;
    }
    let token = token_for("user_a");

    let (status, body) = app.get("/api/vehicle-costs", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 3);
    assert_eq!(body["data"]["total"], "8500.30");
    let categories: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["category"].as_str().unwrap())
        .collect();
    assert!(categories.contains(&"transport"));

    let (_, body) = app.get("/api/vehicle-costs?stock_number=%20STK-1%20", &token).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"]["total"], "8500.10");
}

#[tokio::test]
async fn test_cost_totals_cover_rows_beyond_the_page() {
    let app = TestApp::new();
    let dealer = app.seed_dealer("user_a", "Alpha Motors").await;
    for _ in 0..501 {
        app.store
            .insert_vehicle_cost(dealer.id, vehicle_cost("STK-1", VehicleCostCategory::Repair, "1.00"))
            .await;
    }
    let token = token_for("user_a");

    let (status, body) = app.get("/api/vehicle-costs", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 200);
    assert_eq!(body["data"]["entries"], 501);
    assert_eq!(body["data"]["total"], "501.00");
    assert_eq!(body["data"]["limit"], 200);
    assert_eq!(body["data"]["offset"], 0);

    // la última página trae el resto y el total no cambia
    let (_, body) = app.get("/api/vehicle-costs?limit=500&offset=500", &token).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"]["entries"], 501);
    assert_eq!(body["data"]["total"], "501.00");

    // el límite se recorta al máximo
    let (_, body) = app.get("/api/vehicle-costs?limit=10000", &token).await;
    assert_eq!(body["count"], 500);
    assert_eq!(body["data"]["limit"], 500);
}

#[tokio::test]
async fn test_cost_paging_rejects_invalid_values() {
    let app = TestApp::new();
    app.seed_dealer("user_a", "Alpha Motors").await;
    let token = token_for("user_a");

    for uri in ["/api/return-costs?offset=-1", "/api/return-costs?limit=0", "/api/return-costs?limit=abc"] {
        let (status, body) = app.get(uri, &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_empty_cost_list_reports_zero_in_cents() {
    let app = TestApp::new();
    app.seed_dealer("user_a", "Alpha Motors").await;

    let (_, body) = app.get("/api/return-costs", &token_for("user_a")).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"]["entries"], 0);
    assert_eq!(body["data"]["total"], "0.00");
}

#[tokio::test]
async fn test_return_costs_list() {
    let app = TestApp::new();
    let dealer = app.seed_dealer("user_a", "Alpha Motors").await;
    app.store
        .insert_return_cost(
            dealer.id,
            NewReturnCost {
                stock_number: "STK-9".to_string(),
                vehicle_description: None,
                reason: Some("Failed inspection".to_string()),
                amount: Decimal::from_str("420.50").unwrap(),
                returned_on: None,
            },
        )
        .await;

    let (status, body) = app.get("/api/return-costs", &token_for("user_a")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"]["total"], "420.50");
    assert_eq!(body["data"]["items"][0]["reason"], "Failed inspection");
    assert_eq!(body["data"]["items"][0]["amount"], "420.50");
}

#[tokio::test]
async fn test_costs_are_read_only() {
    let app = TestApp::new();
    app.seed_dealer("user_a", "Alpha Motors").await;

    let (status, _) = app
        .post("/api/vehicle-costs", &token_for("user_a"), serde_json::json!({ "amount": "1.00" }))
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
