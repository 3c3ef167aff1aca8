//! Order recording.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use bazaar_core::UserId;
use bazaar_integration_tests::TestApp;

#[tokio::test]
async fn test_create_order_records_snapshot_and_clears_cart() {
    let app = TestApp::new();
    let mug = app.stock("Mug", 500, "Kitchen").await;
    let user_id = UserId::generate().to_string();
    app.post("/add-to-cart", json!({ "userId": user_id, "itemId": mug.id }))
        .await;

    let response = app
        .post(
            "/createOrder",
            json!({
                "userId": user_id,
                "items": [{ "name": "Mug", "price": 5, "qty": 2 }],
                "totalPrice": 10,
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let order = response.json();
    assert_eq!(order["userId"], user_id.as_str());
    assert_eq!(order["items"][0]["name"], "Mug");
    assert_eq!(order["items"][0]["qty"], 2);
    assert_eq!(order["totalPrice"], 10.0);
    assert!(order["orderDate"].is_string());
    assert!(order["_id"].is_string());

    assert_eq!(app.store.orders().await.len(), 1);
    let cart = app.get(&format!("/cart/{user_id}")).await;
    assert_eq!(cart.json(), json!([]));
}

#[tokio::test]
async fn test_create_order_without_cart() {
    let app = TestApp::new();

    let response = app
        .post(
            "/createOrder",
            json!({
                "userId": UserId::generate().to_string(),
                "items": [],
                "totalPrice": 0,
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.store.orders().await.len(), 1);
}

#[tokio::test]
async fn test_create_order_rejects_malformed_user() {
    let app = TestApp::new();

    let response = app
        .post(
            "/createOrder",
            json!({ "userId": "U1", "items": [], "totalPrice": 0 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({ "error": "Invalid userId" }));
    assert!(app.store.orders().await.is_empty());
}
